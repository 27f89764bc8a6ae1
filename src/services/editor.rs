use tracing::debug;

use crate::error::SeatingError;
use crate::models::range::RangeSpec;
use crate::models::seat::{validate_label, SeatAddress};
use crate::models::section::Section;
use crate::services::history::History;
use crate::services::range;
use crate::services::selection::Selection;

/// Редактор одной открытой секции: состояние секции, ее история и выделение.
///
/// Каждая мутация сначала вычисляет новое значение секции, затем делает снимок
/// предыдущего, даже если значение не изменилось: `undo` после любой мутации
/// возвращает ровно состояние до нее. Ошибки валидации возвращаются до снимка.
#[derive(Debug, Clone)]
pub struct SectionEditor {
    section: Section,
    history: History<Section>,
    selection: Selection,
}

impl SectionEditor {
    /// Открытие секции начинает с пустой историей и пустым выделением.
    pub fn open(section: Section, max_history: Option<usize>) -> Self {
        Self {
            section,
            history: History::new(max_history),
            selection: Selection::default(),
        }
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn name(&self) -> &str {
        &self.section.name
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History<Section> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Запрос существования для сетки. Некорректная метка - просто `false`.
    pub fn has_seat(&self, row: &str, seat: &str) -> bool {
        SeatAddress::new(row, seat).is_ok_and(|address| self.section.has_seat(&address))
    }

    pub fn seat_columns(&self) -> Vec<String> {
        self.section.seat_columns()
    }

    /// Фиксирует новое значение секции со снимком предыдущего.
    /// Возвращает `false`, если значение не изменилось (снимок все равно есть).
    pub fn commit(&mut self, next: Section) -> bool {
        self.history.snapshot(&self.section);
        let changed = next != self.section;
        self.section = next;
        changed
    }

    /// Принимает авторитетное состояние от сервиса без записи в историю.
    pub fn adopt(&mut self, section: Section) {
        self.section = section;
    }

    fn mutate<R, F>(&mut self, f: F) -> Result<R, SeatingError>
    where
        F: FnOnce(&mut Section) -> Result<R, SeatingError>,
    {
        let mut next = self.section.clone();
        let result = f(&mut next)?;
        self.commit(next);
        Ok(result)
    }

    pub fn add_seat(&mut self, row: &str, seat: &str) -> Result<bool, SeatingError> {
        let address = SeatAddress::new(row, seat)?;
        self.mutate(|section| Ok(section.add_seat(&address)))
    }

    pub fn delete_seat(&mut self, row: &str, seat: &str) -> Result<bool, SeatingError> {
        let address = SeatAddress::new(row, seat)?;
        self.mutate(|section| Ok(section.delete_seat(&address)))
    }

    pub fn add_seats(&mut self, row: &str, seats: &[String]) -> Result<usize, SeatingError> {
        self.mutate(|section| section.add_seats(row, seats))
    }

    pub fn delete_row(&mut self, row: &str) -> Result<bool, SeatingError> {
        validate_label("row", row)?;
        self.mutate(|section| Ok(section.delete_row(row)))
    }

    pub fn rename_row(&mut self, old: &str, new: &str) -> Result<bool, SeatingError> {
        self.mutate(|section| section.rename_row(old, new))
    }

    pub fn change_seat_number(
        &mut self,
        row: &str,
        old: &str,
        new: &str,
    ) -> Result<bool, SeatingError> {
        self.mutate(|section| section.change_seat_number(row, old, new))
    }

    /// Генерирует диапазон и применяет его одной отменяемой операцией.
    /// Возвращает число добавленных мест.
    pub fn apply_range(&mut self, spec: &RangeSpec) -> Result<usize, SeatingError> {
        let placements = range::generate(spec, &self.section.row_labels())?;
        let added = self.mutate(|section| Ok(section.apply_range_result(&placements)))?;
        debug!(
            "Applied range to section {}: {} new seats",
            self.section.name, added
        );
        Ok(added)
    }

    /// Удаляет все выделенные существующие места одной операцией и сбрасывает выделение.
    pub fn delete_selected(&mut self) -> usize {
        let addresses = self.selection.addresses();
        let mut next = self.section.clone();
        let removed = addresses
            .iter()
            .filter(|address| next.delete_seat(address))
            .count();
        self.commit(next);
        self.selection.clear();
        removed
    }

    /// Одиночный клик: только переключает выделение, никогда не удаляет.
    pub fn activate(&mut self, row: &str, seat: &str) -> Result<bool, SeatingError> {
        let address = SeatAddress::new(row, seat)?;
        Ok(self.selection.toggle(&address))
    }

    /// Двойной клик по пустой ячейке добавляет место; по существующей - ничего.
    pub fn double_activate(&mut self, row: &str, seat: &str) -> Result<bool, SeatingError> {
        if self.has_seat(row, seat) {
            return Ok(false);
        }
        self.add_seat(row, seat)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.section)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::range::Parity;
    use proptest::prelude::*;

    fn editor() -> SectionEditor {
        SectionEditor::open(Section::new("Stalls", false), None)
    }

    #[test]
    fn undo_restores_exact_pre_mutation_snapshot() {
        let mut editor = editor();
        editor.add_seat("1", "1").unwrap();
        let before = editor.section().clone();

        editor.add_seat("1", "2").unwrap();
        let after = editor.section().clone();

        assert!(editor.undo());
        assert_eq!(editor.section(), &before);
        assert!(editor.redo());
        assert_eq!(editor.section(), &after);
    }

    #[test]
    fn mutation_after_undo_clears_redo() {
        let mut editor = editor();
        editor.add_seat("1", "1").unwrap();
        editor.undo();
        assert!(editor.can_redo());
        editor.add_seat("2", "1").unwrap();
        assert!(!editor.can_redo());
    }

    #[test]
    fn invalid_input_records_nothing() {
        let mut editor = editor();
        assert!(matches!(
            editor.add_seat("", "1"),
            Err(SeatingError::InvalidAddress(_))
        ));
        assert!(matches!(
            editor.apply_range(&RangeSpec::new("1", "B", "1", "2")),
            Err(SeatingError::InvalidRange(_))
        ));
        assert!(!editor.can_undo());
        assert!(editor.section().rows.is_empty());
    }

    #[test]
    fn undo_after_repeated_add_restores_that_state() {
        let mut editor = editor();
        editor.add_seat("1", "1").unwrap();
        let before = editor.section().clone();

        assert!(!editor.add_seat("1", "1").unwrap());
        assert_eq!(editor.history().undo_depth(), 2);
        assert!(editor.undo());
        assert_eq!(editor.section(), &before);
        assert_eq!(editor.section().seat_count(), 1);
    }

    #[test]
    fn unchanged_range_and_delete_are_still_undo_steps() {
        let mut editor = editor();
        editor.apply_range(&RangeSpec::new("1", "1", "1", "2")).unwrap();
        let before = editor.section().clone();

        assert_eq!(editor.apply_range(&RangeSpec::new("1", "1", "1", "2")).unwrap(), 0);
        assert!(!editor.delete_seat("5", "5").unwrap());
        assert!(editor.undo());
        assert_eq!(editor.section(), &before);
        assert!(editor.undo());
        assert_eq!(editor.section(), &before);
        assert!(editor.undo());
        assert!(editor.section().rows.is_empty());
    }

    #[test]
    fn range_is_one_undo_step() {
        let mut editor = editor();
        let spec = RangeSpec {
            parity: Parity::Odd,
            ..RangeSpec::new("1", "3", "1", "4")
        };
        assert_eq!(editor.apply_range(&spec).unwrap(), 6);
        assert_eq!(editor.section().row_labels(), vec!["1", "2", "3"]);
        assert!(editor.undo());
        assert!(editor.section().rows.is_empty());
    }

    #[test]
    fn activate_toggles_selection_without_touching_section() {
        let mut editor = editor();
        editor.add_seat("1", "1").unwrap();
        assert!(editor.activate("1", "1").unwrap());
        assert!(editor.has_seat("1", "1"));
        assert!(!editor.activate("1", "1").unwrap());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn double_activate_adds_missing_seat_only() {
        let mut editor = editor();
        assert!(editor.double_activate("2", "7").unwrap());
        assert!(editor.has_seat("2", "7"));
        assert!(!editor.double_activate("2", "7").unwrap());
        assert_eq!(editor.history().undo_depth(), 1);
    }

    #[test]
    fn delete_selected_is_single_step() {
        let mut editor = editor();
        editor.apply_range(&RangeSpec::new("1", "1", "1", "3")).unwrap();
        editor.activate("1", "1").unwrap();
        editor.activate("1", "3").unwrap();
        editor.activate("9", "9").unwrap();
        assert_eq!(editor.delete_selected(), 2);
        assert!(editor.selection().is_empty());
        assert_eq!(editor.section().row_labels(), vec!["1"]);
        assert!(editor.undo());
        assert_eq!(editor.section().seat_count(), 3);
    }

    #[test]
    fn emptied_row_survives_deletes() {
        let mut editor = editor();
        editor.add_seat("A", "1").unwrap();
        editor.delete_seat("A", "1").unwrap();
        assert_eq!(editor.section().row_labels(), vec!["A"]);
    }

    fn label() -> impl Strategy<Value = String> {
        "[0-9A-C]{1,3}"
    }

    proptest! {
        #[test]
        fn add_then_has_delete_then_not(row in label(), seat in label()) {
            let mut editor = editor();
            editor.add_seat(&row, &seat).unwrap();
            prop_assert!(editor.has_seat(&row, &seat));
            editor.delete_seat(&row, &seat).unwrap();
            prop_assert!(!editor.has_seat(&row, &seat));
        }

        #[test]
        fn add_is_idempotent(ops in prop::collection::vec((label(), label()), 1..20)) {
            let mut once = editor();
            let mut twice = editor();
            for (row, seat) in &ops {
                once.add_seat(row, seat).unwrap();
                twice.add_seat(row, seat).unwrap();
                twice.add_seat(row, seat).unwrap();
            }
            prop_assert_eq!(once.section(), twice.section());
        }

        #[test]
        fn undo_redo_round_trip(
            ops in prop::collection::vec((label(), label(), any::<bool>()), 1..20)
        ) {
            let mut editor = editor();
            for (row, seat, add) in &ops {
                let before = editor.section().clone();
                if *add {
                    editor.add_seat(row, seat).unwrap();
                } else {
                    editor.delete_seat(row, seat).unwrap();
                }
                let after = editor.section().clone();
                prop_assert!(editor.undo());
                prop_assert_eq!(editor.section(), &before);
                prop_assert!(editor.redo());
                prop_assert_eq!(editor.section(), &after);
            }
        }
    }
}
