use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::SeatingError;

/// Фильтр четности номеров мест.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    All,
    Even,
    Odd,
}

impl Parity {
    pub fn accepts(self, number: i64) -> bool {
        match self {
            Parity::All => true,
            Parity::Even => number.rem_euclid(2) == 0,
            Parity::Odd => number.rem_euclid(2) == 1,
        }
    }

    /// Шаг счетчика в непрерывной нумерации.
    pub fn step(self) -> i64 {
        match self {
            Parity::All => 1,
            Parity::Even | Parity::Odd => 2,
        }
    }
}

/// Запрос на массовую генерацию рядов и мест (форма "Add Row Range").
/// Поля в JSON - snake_case, как у сервиса.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RangeSpec {
    #[validate(length(min = 1, message = "start_row must not be empty"))]
    pub start_row: String,
    #[validate(length(min = 1, message = "end_row must not be empty"))]
    pub end_row: String,
    #[validate(length(min = 1, message = "start_seat must not be empty"))]
    pub start_seat: String,
    #[validate(length(min = 1, message = "end_seat must not be empty"))]
    pub end_seat: String,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub row_prefix: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub row_suffix: String,
    #[serde(default)]
    pub unnumbered_rows: bool,
    #[serde(default)]
    pub continuous: bool,
}

impl RangeSpec {
    pub fn new(
        start_row: impl Into<String>,
        end_row: impl Into<String>,
        start_seat: impl Into<String>,
        end_seat: impl Into<String>,
    ) -> Self {
        Self {
            start_row: start_row.into(),
            end_row: end_row.into(),
            start_seat: start_seat.into(),
            end_seat: end_seat.into(),
            ..Default::default()
        }
    }

    /// Проверка полей на границе, до передачи в генератор.
    pub fn check(&self) -> Result<(), SeatingError> {
        self.validate()
            .map_err(|e| SeatingError::InvalidRange(e.to_string()))
    }
}

/// Одна пара (ряд, место), выданная генератором.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub row: String,
    pub seat: String,
    /// Подсказка для отображения: метку ряда можно скрыть.
    pub unnumbered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_filters_numbers() {
        assert!(Parity::All.accepts(3));
        assert!(Parity::Even.accepts(2));
        assert!(!Parity::Even.accepts(3));
        assert!(Parity::Odd.accepts(-1));
        assert!(!Parity::Odd.accepts(0));
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let spec: RangeSpec = serde_json::from_str(
            r#"{"start_row":"1","end_row":"3","start_seat":"1","end_seat":"10"}"#,
        )
        .unwrap();
        assert_eq!(spec.parity, Parity::All);
        assert!(!spec.continuous);
        assert!(!spec.unnumbered_rows);
        assert_eq!(spec.row_prefix, "");
    }

    #[test]
    fn spec_serializes_snake_case() {
        let spec = RangeSpec {
            parity: Parity::Even,
            row_prefix: "A-".into(),
            ..RangeSpec::new("1", "2", "1", "3")
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["parity"], "even");
        assert_eq!(value["row_prefix"], "A-");
        assert_eq!(value["unnumbered_rows"], false);
    }

    #[test]
    fn empty_bounds_fail_validation() {
        let spec = RangeSpec::new("", "2", "1", "3");
        assert!(matches!(spec.check(), Err(SeatingError::InvalidRange(_))));
        assert!(RangeSpec::new("1", "2", "1", "3").check().is_ok());
    }
}
