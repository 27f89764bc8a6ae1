use std::collections::HashSet;

use crate::models::seat::SeatAddress;

/// Подсвеченные ячейки сетки. Чисто локальное состояние интерфейса:
/// не сохраняется и не влияет на секцию.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: HashSet<SeatAddress>,
}

impl Selection {
    /// Переключает ячейку. Возвращает `true`, если она теперь выделена.
    pub fn toggle(&mut self, address: &SeatAddress) -> bool {
        if self.keys.remove(address) {
            false
        } else {
            self.keys.insert(address.clone());
            true
        }
    }

    pub fn is_selected(&self, address: &SeatAddress) -> bool {
        self.keys.contains(address)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Выделенные адреса в стабильном порядке.
    pub fn addresses(&self) -> Vec<SeatAddress> {
        let mut addresses: Vec<SeatAddress> = self.keys.iter().cloned().collect();
        addresses.sort();
        addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::default();
        let cell = SeatAddress::new("1", "2").unwrap();
        assert!(selection.toggle(&cell));
        assert!(selection.is_selected(&cell));
        assert!(!selection.toggle(&cell));
        assert!(selection.is_empty());
    }

    #[test]
    fn addresses_are_sorted() {
        let mut selection = Selection::default();
        selection.toggle(&SeatAddress::new("2", "1").unwrap());
        selection.toggle(&SeatAddress::new("1", "1").unwrap());
        let rows: Vec<String> = selection.addresses().into_iter().map(|a| a.row).collect();
        assert_eq!(rows, vec!["1", "2"]);
    }
}
