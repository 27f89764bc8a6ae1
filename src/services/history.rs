/// Линейная история undo/redo на полных снимках состояния.
///
/// Снимок - независимая копия значения, поэтому `undo` + `redo` возвращают
/// побитово то же состояние. Новый снимок после `undo` отбрасывает `future`.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    future: Vec<T>,
    /// `None` - без ограничения. Иначе самый старый снимок вытесняется.
    max_entries: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> History<T> {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_entries,
        }
    }

    /// Возвращает `false`, если отменять нечего.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, previous);
        self.future.push(replaced);
        true
    }

    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, next);
        self.past.push(replaced);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

impl<T: Clone> History<T> {
    /// Запоминает состояние до мутации и очищает `future`.
    pub fn snapshot(&mut self, current: &T) {
        self.past.push(current.clone());
        self.future.clear();

        if let Some(max) = self.max_entries {
            if self.past.len() > max {
                let excess = self.past.len() - max;
                self.past.drain(..excess);
            }
        }
    }
}
