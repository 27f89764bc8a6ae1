use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::error::SeatingError;
use crate::models::{SeatingPlan, Section};

/// Файл проекта: весь план рассадки одним JSON-документом.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

/// Хранилище проектов в каталоге: `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    dir: PathBuf,
}

impl ProjectStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Имя проекта становится именем файла, поэтому разделители путей запрещены.
    fn path_for(&self, name: &str) -> Result<PathBuf, SeatingError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains('\0')
        {
            return Err(SeatingError::InvalidProjectName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    pub async fn save(&self, name: &str, plan: &SeatingPlan) -> Result<(), SeatingError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).await?;

        let file = ProjectFile {
            name: name.to_string(),
            saved_at: Utc::now(),
            sections: plan.sections.clone(),
        };
        let data = serde_json::to_vec_pretty(&file)?;
        fs::write(&path, data).await?;
        info!("Saved project {} to {}", name, path.display());
        Ok(())
    }

    pub async fn load(&self, name: &str) -> Result<SeatingPlan, SeatingError> {
        let file = self.read(name).await?;
        info!("Loaded project {} ({} sections)", name, file.sections.len());
        Ok(SeatingPlan {
            name: file.name,
            sections: file.sections,
        })
    }

    pub async fn read(&self, name: &str) -> Result<ProjectFile, SeatingError> {
        let path = self.path_for(name)?;
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SeatingError::ProjectNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    /// Имена сохраненных проектов по алфавиту. Нет каталога - пустой список.
    pub async fn list(&self) -> Result<Vec<String>, SeatingError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn delete(&self, name: &str) -> Result<(), SeatingError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted project {}", name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SeatingError::ProjectNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatAddress;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_list_load_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ProjectStorage::new(temp_dir.path().join("projects"));
        assert!(storage.list().await.unwrap().is_empty());

        let mut plan = SeatingPlan::new("Opera");
        plan.add_section("Stalls", false).unwrap();
        plan.get_mut("Stalls")
            .unwrap()
            .add_seat(&SeatAddress::new("1", "1").unwrap());

        storage.save("opera", &plan).await.unwrap();
        assert_eq!(storage.list().await.unwrap(), vec!["opera"]);

        let loaded = storage.load("opera").await.unwrap();
        assert_eq!(loaded.sections, plan.sections);
        assert_eq!(loaded.name, "opera");

        storage.delete("opera").await.unwrap();
        assert!(matches!(
            storage.load("opera").await,
            Err(SeatingError::ProjectNotFound(_))
        ));
        assert!(matches!(
            storage.delete("opera").await,
            Err(SeatingError::ProjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn path_like_names_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ProjectStorage::new(temp_dir.path());
        let plan = SeatingPlan::default();
        for name in ["", "../evil", "a/b", ".hidden"] {
            assert!(matches!(
                storage.save(name, &plan).await,
                Err(SeatingError::InvalidProjectName(_))
            ));
        }
    }
}
