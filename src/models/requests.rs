//! Тела запросов и ответов сервиса, общие для клиента и сервера.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub name: String,
    #[serde(default)]
    pub is_ga: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSectionRequest {
    pub new_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneQuery {
    #[serde(default = "default_clone_count")]
    pub count: usize,
}

fn default_clone_count() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneResponse {
    pub created: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRequest {
    pub seat_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSeatsRequest {
    pub seat_numbers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSeatsResponse {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectList {
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub status: String,
    pub name: String,
}
