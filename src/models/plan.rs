use serde::{Deserialize, Serialize};

use crate::error::SeatingError;
use crate::models::section::Section;

/// Краткая информация о секции для списка.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub is_ga: bool,
}

/// План рассадки - коллекция секций с уникальными именами в порядке создания.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingPlan {
    pub name: String,
    pub sections: Vec<Section>,
}

impl SeatingPlan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|s| SectionSummary {
                name: s.name.clone(),
                is_ga: s.is_ga,
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Section, SeatingError> {
        self.sections
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| SeatingError::SectionNotFound(name.to_string()))
    }

    pub fn section(&self, name: &str) -> Result<&Section, SeatingError> {
        self.get(name)
            .ok_or_else(|| SeatingError::SectionNotFound(name.to_string()))
    }

    pub fn add_section(&mut self, name: &str, is_ga: bool) -> Result<&Section, SeatingError> {
        if name.trim().is_empty() {
            return Err(SeatingError::InvalidAddress(
                "section name must not be empty".to_string(),
            ));
        }
        if self.get(name).is_some() {
            return Err(SeatingError::SectionExists(name.to_string()));
        }
        self.sections.push(Section::new(name, is_ga));
        Ok(&self.sections[self.sections.len() - 1])
    }

    /// Удаление отсутствующей секции - не ошибка.
    pub fn delete_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    pub fn rename_section(&mut self, name: &str, new_name: &str) -> Result<&Section, SeatingError> {
        if new_name.trim().is_empty() {
            return Err(SeatingError::InvalidAddress(
                "section name must not be empty".to_string(),
            ));
        }
        if name != new_name && self.get(new_name).is_some() {
            return Err(SeatingError::SectionExists(new_name.to_string()));
        }
        let section = self.get_mut(name)?;
        section.name = new_name.to_string();
        Ok(section)
    }

    /// Создает `count` глубоких копий секции с именами `{name}_copy{i}`,
    /// где `i` - наименьший свободный номер. Возвращает имена созданных секций.
    pub fn clone_section(&mut self, name: &str, count: usize) -> Result<Vec<String>, SeatingError> {
        let source = self.section(name)?.clone();
        let mut created = Vec::with_capacity(count);
        let mut index = 1;
        while created.len() < count {
            let candidate = format!("{}_copy{}", name, index);
            index += 1;
            if self.get(&candidate).is_some() {
                continue;
            }
            let mut copy = source.clone();
            copy.name = candidate.clone();
            self.sections.push(copy);
            created.push(candidate);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::SeatAddress;

    #[test]
    fn section_names_are_unique() {
        let mut plan = SeatingPlan::new("Arena");
        plan.add_section("A", false).unwrap();
        assert!(matches!(
            plan.add_section("A", true),
            Err(SeatingError::SectionExists(_))
        ));
        assert_eq!(
            plan.summaries(),
            vec![SectionSummary { name: "A".into(), is_ga: false }]
        );
    }

    #[test]
    fn rename_checks_conflicts_and_existence() {
        let mut plan = SeatingPlan::default();
        plan.add_section("A", false).unwrap();
        plan.add_section("B", false).unwrap();
        assert!(matches!(
            plan.rename_section("A", "B"),
            Err(SeatingError::SectionExists(_))
        ));
        assert!(matches!(
            plan.rename_section("Z", "Y"),
            Err(SeatingError::SectionNotFound(_))
        ));
        plan.rename_section("A", "Stalls").unwrap();
        assert!(plan.get("Stalls").is_some());
        assert!(plan.get("A").is_none());
    }

    #[test]
    fn clone_makes_independent_copies_with_free_names() {
        let mut plan = SeatingPlan::default();
        plan.add_section("A", false).unwrap();
        plan.get_mut("A")
            .unwrap()
            .add_seat(&SeatAddress::new("1", "1").unwrap());
        plan.add_section("A_copy1", false).unwrap();

        let created = plan.clone_section("A", 2).unwrap();
        assert_eq!(created, vec!["A_copy2", "A_copy3"]);
        assert_eq!(plan.get("A_copy2").unwrap().seat_count(), 1);

        plan.get_mut("A_copy2")
            .unwrap()
            .add_seat(&SeatAddress::new("1", "2").unwrap());
        assert_eq!(plan.get("A").unwrap().seat_count(), 1);
    }

    #[test]
    fn delete_missing_section_is_noop() {
        let mut plan = SeatingPlan::default();
        assert!(!plan.delete_section("nope"));
    }
}
