pub mod plan;
pub mod range;
pub mod requests;
pub mod seat;
pub mod section;

pub use plan::{SeatingPlan, SectionSummary};
pub use range::{Parity, Placement, RangeSpec};
pub use seat::{compare_labels, Seat, SeatAddress};
pub use section::{Row, Section};
