use serde::{Deserialize, Serialize};

use crate::error::SeatingError;
use crate::models::range::Placement;
use crate::models::seat::{sort_labels, validate_label, Seat, SeatAddress};

/// Ряд секции. Пустой ряд - валидная сущность (например, проход), он не удаляется
/// автоматически, когда из него убирают последнее место.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub row_number: String,
    #[serde(default)]
    pub seats: Vec<Seat>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unnumbered: bool,
}

impl Row {
    pub fn new(row_number: impl Into<String>) -> Self {
        Self {
            row_number: row_number.into(),
            seats: Vec::new(),
            unnumbered: false,
        }
    }

    pub fn has_seat(&self, seat: &str) -> bool {
        self.seats.iter().any(|s| s.seat_number == seat)
    }
}

/// Секция: упорядоченные по вставке ряды с уникальными метками,
/// внутри ряда - уникальные метки мест.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub is_ga: bool,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(name: impl Into<String>, is_ga: bool) -> Self {
        Self {
            name: name.into(),
            is_ga,
            rows: Vec::new(),
        }
    }

    pub fn row(&self, row: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.row_number == row)
    }

    fn row_mut(&mut self, row: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.row_number == row)
    }

    /// Находит ряд или добавляет его в конец последовательности.
    fn row_or_insert(&mut self, row: &str, unnumbered: bool) -> &mut Row {
        let index = match self.rows.iter().position(|r| r.row_number == row) {
            Some(index) => index,
            None => {
                self.rows.push(Row {
                    unnumbered,
                    ..Row::new(row)
                });
                self.rows.len() - 1
            }
        };
        &mut self.rows[index]
    }

    pub fn row_labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.row_number.clone()).collect()
    }

    /// Идемпотентно: повторное добавление ничего не меняет.
    /// Возвращает `true`, если место было добавлено.
    pub fn add_seat(&mut self, address: &SeatAddress) -> bool {
        self.insert(&address.row, &address.seat, false)
    }

    fn insert(&mut self, row: &str, seat: &str, unnumbered: bool) -> bool {
        let row = self.row_or_insert(row, unnumbered);
        if row.has_seat(seat) {
            return false;
        }
        row.seats.push(Seat::new(seat));
        true
    }

    /// Удаляет место, если оно есть. Опустевший ряд остается.
    pub fn delete_seat(&mut self, address: &SeatAddress) -> bool {
        let Some(row) = self.row_mut(&address.row) else {
            return false;
        };
        let before = row.seats.len();
        row.seats.retain(|s| s.seat_number != address.seat);
        row.seats.len() != before
    }

    pub fn has_seat(&self, address: &SeatAddress) -> bool {
        self.row(&address.row)
            .is_some_and(|r| r.has_seat(&address.seat))
    }

    /// Применяет результат генератора в выданном порядке. Возвращает число новых мест.
    pub fn apply_range_result(&mut self, placements: &[Placement]) -> usize {
        placements
            .iter()
            .filter(|p| self.insert(&p.row, &p.seat, p.unnumbered))
            .count()
    }

    /// Добавляет список мест в один ряд (bulk). Ряд создается, если его нет.
    pub fn add_seats(&mut self, row: &str, seats: &[String]) -> Result<usize, SeatingError> {
        validate_label("row", row)?;
        for seat in seats {
            validate_label("seat", seat)?;
        }
        self.row_or_insert(row, false);
        Ok(seats
            .iter()
            .filter(|seat| self.insert(row, seat, false))
            .count())
    }

    /// Удаляет ряд целиком вместе с местами.
    pub fn delete_row(&mut self, row: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.row_number != row);
        self.rows.len() != before
    }

    /// Переименовывает ряд, сохраняя места и позицию в последовательности.
    pub fn rename_row(&mut self, old: &str, new: &str) -> Result<bool, SeatingError> {
        validate_label("row", new)?;
        if old == new {
            return Ok(false);
        }
        if self.row(new).is_some() {
            return Err(SeatingError::InvalidAddress(format!(
                "row '{}' already exists",
                new
            )));
        }
        match self.row_mut(old) {
            Some(row) => {
                row.row_number = new.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Меняет номер места внутри ряда. Если новый номер уже занят, старое место
    /// просто исчезает (в ряду не бывает дубликатов).
    pub fn change_seat_number(
        &mut self,
        row: &str,
        old: &str,
        new: &str,
    ) -> Result<bool, SeatingError> {
        validate_label("seat", new)?;
        let Some(row) = self.row_mut(row) else {
            return Ok(false);
        };
        let Some(index) = row.seats.iter().position(|s| s.seat_number == old) else {
            return Ok(false);
        };
        if row.has_seat(new) {
            row.seats.remove(index);
        } else {
            row.seats[index].seat_number = new.to_string();
        }
        Ok(true)
    }

    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|r| r.seats.len()).sum()
    }

    /// Уникальные номера мест по всем рядам в порядке отображения - столбцы сетки.
    pub fn seat_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for seat in self.rows.iter().flat_map(|r| r.seats.iter()) {
            if !columns.contains(&seat.seat_number) {
                columns.push(seat.seat_number.clone());
            }
        }
        sort_labels(&mut columns);
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(row: &str, seat: &str) -> SeatAddress {
        SeatAddress::new(row, seat).unwrap()
    }

    #[test]
    fn add_then_has_and_delete_then_not() {
        let mut section = Section::new("A", false);
        assert!(section.add_seat(&addr("1", "5")));
        assert!(section.has_seat(&addr("1", "5")));
        assert!(section.delete_seat(&addr("1", "5")));
        assert!(!section.has_seat(&addr("1", "5")));
    }

    #[test]
    fn add_seat_is_idempotent() {
        let mut once = Section::new("A", false);
        once.add_seat(&addr("1", "1"));
        let mut twice = once.clone();
        assert!(!twice.add_seat(&addr("1", "1")));
        assert_eq!(once, twice);
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut section = Section::new("A", false);
        section.add_seat(&addr("10", "1"));
        section.add_seat(&addr("2", "1"));
        section.add_seat(&addr("B", "1"));
        assert_eq!(section.row_labels(), vec!["10", "2", "B"]);
    }

    #[test]
    fn emptied_row_stays() {
        let mut section = Section::new("A", false);
        section.add_seat(&addr("1", "1"));
        section.add_seat(&addr("1", "2"));
        section.delete_seat(&addr("1", "1"));
        section.delete_seat(&addr("1", "2"));
        assert_eq!(section.row_labels(), vec!["1"]);
        assert_eq!(section.seat_count(), 0);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut section = Section::new("A", false);
        assert!(!section.delete_seat(&addr("9", "9")));
        section.add_seat(&addr("1", "1"));
        assert!(!section.delete_seat(&addr("1", "2")));
        assert_eq!(section.seat_count(), 1);
    }

    #[test]
    fn apply_range_result_creates_rows_in_order() {
        let mut section = Section::new("A", false);
        let placements = vec![
            Placement { row: "1".into(), seat: "1".into(), unnumbered: false },
            Placement { row: "1".into(), seat: "2".into(), unnumbered: false },
            Placement { row: "2".into(), seat: "1".into(), unnumbered: true },
            Placement { row: "1".into(), seat: "2".into(), unnumbered: false },
        ];
        assert_eq!(section.apply_range_result(&placements), 3);
        assert_eq!(section.row_labels(), vec!["1", "2"]);
        assert!(section.row("2").unwrap().unnumbered);
        assert!(!section.row("1").unwrap().unnumbered);
    }

    #[test]
    fn bulk_add_creates_row_even_when_empty() {
        let mut section = Section::new("A", false);
        assert_eq!(section.add_seats("Aisle", &[]).unwrap(), 0);
        assert_eq!(section.row_labels(), vec!["Aisle"]);
        let seats = vec!["1".to_string(), "2".to_string(), "1".to_string()];
        assert_eq!(section.add_seats("1", &seats).unwrap(), 2);
        assert!(section.add_seats("1", &["".to_string()]).is_err());
    }

    #[test]
    fn rename_row_keeps_position_and_seats() {
        let mut section = Section::new("A", false);
        section.add_seat(&addr("1", "1"));
        section.add_seat(&addr("2", "1"));
        assert!(section.rename_row("1", "R1").unwrap());
        assert_eq!(section.row_labels(), vec!["R1", "2"]);
        assert!(section.has_seat(&addr("R1", "1")));
        assert!(section.rename_row("R1", "2").is_err());
        assert!(!section.rename_row("missing", "X").unwrap());
    }

    #[test]
    fn change_seat_number_renames_or_merges() {
        let mut section = Section::new("A", false);
        section.add_seat(&addr("1", "1"));
        section.add_seat(&addr("1", "2"));
        assert!(section.change_seat_number("1", "1", "5").unwrap());
        assert!(section.has_seat(&addr("1", "5")));
        assert!(section.change_seat_number("1", "5", "2").unwrap());
        assert_eq!(section.row("1").unwrap().seats, vec![Seat::new("2")]);
        assert!(!section.change_seat_number("1", "9", "10").unwrap());
    }

    #[test]
    fn delete_row_removes_entity() {
        let mut section = Section::new("A", false);
        section.add_seat(&addr("1", "1"));
        assert!(section.delete_row("1"));
        assert!(section.rows.is_empty());
        assert!(!section.delete_row("1"));
    }

    #[test]
    fn seat_columns_are_distinct_and_sorted() {
        let mut section = Section::new("A", false);
        for (row, seat) in [("1", "10"), ("1", "2"), ("2", "2"), ("2", "B")] {
            section.add_seat(&addr(row, seat));
        }
        assert_eq!(section.seat_columns(), vec!["2", "10", "B"]);
    }

    #[test]
    fn wire_shape_matches_service() {
        let mut section = Section::new("Balcony", true);
        section.add_seat(&addr("1", "1"));
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Balcony",
                "is_ga": true,
                "rows": [{ "row_number": "1", "seats": [{ "seat_number": "1" }] }]
            })
        );
    }
}
