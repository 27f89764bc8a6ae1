pub mod editor;
pub mod history;
pub mod range;
pub mod selection;
pub mod session;

pub use editor::SectionEditor;
pub use history::History;
pub use selection::Selection;
pub use session::{Commit, SeatingBackend, SyncedEditor, Ticket, Workspace};
