use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::SeatingError;

/// Место внутри ряда. Принадлежит ряду, собственного жизненного цикла нет.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub seat_number: String,
}

impl Seat {
    pub fn new(seat_number: impl Into<String>) -> Self {
        Self {
            seat_number: seat_number.into(),
        }
    }
}

/// Адрес места: пара (ряд, место). Равенство - точное совпадение строк.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatAddress {
    pub row: String,
    pub seat: String,
}

impl SeatAddress {
    /// Создает адрес, отклоняя пустые метки.
    pub fn new(row: impl Into<String>, seat: impl Into<String>) -> Result<Self, SeatingError> {
        let row = row.into();
        let seat = seat.into();
        validate_label("row", &row)?;
        validate_label("seat", &seat)?;
        Ok(Self { row, seat })
    }
}

impl std::fmt::Display for SeatAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.row, self.seat)
    }
}

/// Проверка метки ряда или места: пустые и состоящие из пробелов - ошибка.
pub fn validate_label(kind: &str, label: &str) -> Result<(), SeatingError> {
    if label.trim().is_empty() {
        return Err(SeatingError::InvalidAddress(format!(
            "{} label must not be empty",
            kind
        )));
    }
    Ok(())
}

/// Разбирает метку как целое число: необязательный минус и только ASCII-цифры.
pub fn parse_integer(label: &str) -> Option<i64> {
    let digits = label.strip_prefix('-').unwrap_or(label);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    label.parse().ok()
}

/// Порядок меток для отображения: численно, если обе метки - целые числа,
/// иначе лексикографически.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (parse_integer(a), parse_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Сортирует метки столбцов для сетки.
///
/// На смешанных метках `compare_labels` не транзитивно ("9" < "10" < "1A" < "9"),
/// поэтому числа и строки сортируются отдельно и затем сливаются.
pub fn sort_labels(labels: &mut Vec<String>) {
    let (mut numeric, mut other): (Vec<String>, Vec<String>) = labels
        .drain(..)
        .partition(|label| parse_integer(label).is_some());
    numeric.sort_by_key(|label| parse_integer(label));
    other.sort();

    let mut numeric = numeric.into_iter().peekable();
    let mut other = other.into_iter().peekable();
    loop {
        let take_numeric = match (numeric.peek(), other.peek()) {
            (Some(n), Some(o)) => compare_labels(n, o) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_numeric { numeric.next() } else { other.next() };
        labels.extend(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_labels_compare_numerically() {
        assert_eq!(compare_labels("2", "10"), Ordering::Less);
        assert_eq!(compare_labels("10", "2"), Ordering::Greater);
        assert_eq!(compare_labels("-1", "0"), Ordering::Less);
        assert_eq!(compare_labels("7", "7"), Ordering::Equal);
    }

    #[test]
    fn mixed_labels_compare_lexicographically() {
        // "2" < "B" по строкам
        assert_eq!(compare_labels("2", "B"), Ordering::Less);
        // "A" не число, поэтому сравнение строковое
        assert_eq!(compare_labels("A", "10"), Ordering::Greater);
        assert_eq!(compare_labels("AA", "B"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_equal_numerically_but_not_as_addresses() {
        assert_eq!(compare_labels("01", "1"), Ordering::Equal);
        let a = SeatAddress::new("1", "01").unwrap();
        let b = SeatAddress::new("1", "1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn integer_pattern_is_strict() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer("+3"), None);
        assert_eq!(parse_integer("3a"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer(" 1"), None);
    }

    #[test]
    fn sort_labels_puts_numbers_in_order() {
        let mut labels: Vec<String> = ["10", "2", "1", "3"].iter().map(|s| s.to_string()).collect();
        sort_labels(&mut labels);
        assert_eq!(labels, vec!["1", "2", "3", "10"]);

        let mut labels: Vec<String> = ["B", "10", "A", "2"].iter().map(|s| s.to_string()).collect();
        sort_labels(&mut labels);
        assert_eq!(labels, vec!["2", "10", "A", "B"]);
    }

    #[test]
    fn sort_labels_survives_non_transitive_input() {
        let mut labels: Vec<String> = ["9", "1A", "10"].iter().map(|s| s.to_string()).collect();
        sort_labels(&mut labels);
        assert_eq!(labels.len(), 3);
        assert!(labels.contains(&"1A".to_string()));
    }

    #[test]
    fn empty_labels_are_rejected() {
        assert!(matches!(
            SeatAddress::new("", "1"),
            Err(SeatingError::InvalidAddress(_))
        ));
        assert!(matches!(
            SeatAddress::new("1", "  "),
            Err(SeatingError::InvalidAddress(_))
        ));
        assert!(SeatAddress::new("A", "1").is_ok());
    }
}
