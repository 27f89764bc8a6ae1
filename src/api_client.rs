//! api_client.rs
//!
//! HTTP-клиент сервиса хранения планов рассадки.
//!
//! Все метки из пользовательского ввода попадают в путь отдельными сегментами
//! через `Url::path_segments_mut`, поэтому они всегда percent-encoded
//! (`"A/B"` уходит как `A%2FB`). Ответ с кодом ошибки превращается в
//! `SeatingError::RequestFailure` со статусом и текстом `detail` из тела.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::SeatingError;
use crate::models::requests::{
    BulkSeatsRequest, CloneResponse, CreateSectionRequest, ProjectList, ProjectRequest,
    RenameSectionRequest, SeatRequest,
};
use crate::models::{RangeSpec, SeatAddress, Section, SectionSummary};
use crate::services::session::SeatingBackend;

/// Клиент для взаимодействия с API сервиса хранения.
#[derive(Clone)]
pub struct ApiClient {
    /// Базовый URL, например `http://127.0.0.1:8000/api`.
    base_url: Url,
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
}

fn client_error(message: String) -> SeatingError {
    SeatingError::RequestFailure {
        status: None,
        message,
    }
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SeatingError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| client_error(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(client_error(format!("base url '{}' cannot carry a path", base_url)));
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Создает клиент на основе настроек приложения.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SeatingError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Собирает URL из сегментов; каждый сегмент кодируется отдельно.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SeatingError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| client_error(format!("base url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Пропускает успешный ответ, иначе читает `detail` из тела.
    async fn check(response: Response) -> Result<Response, SeatingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body);
        error!("Seating service responded {}: {}", status, message);
        Err(SeatingError::RequestFailure {
            status: Some(status.as_u16()),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SeatingError> {
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    // === Секции ===

    pub async fn list_sections(&self) -> Result<Vec<SectionSummary>, SeatingError> {
        let url = self.endpoint(&["sections"])?;
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;
        Self::read_json(response).await
    }

    pub async fn get_section(&self, name: &str) -> Result<Section, SeatingError> {
        let url = self.endpoint(&["sections", name])?;
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;
        Self::read_json(response).await
    }

    pub async fn create_section(&self, name: &str, is_ga: bool) -> Result<Section, SeatingError> {
        let url = self.endpoint(&["sections"])?;
        info!("Creating section {} (is_ga={})", name, is_ga);
        let request = CreateSectionRequest {
            name: name.to_string(),
            is_ga,
        };
        let response = self.http_client.post(url).json(&request).send().await?;
        Self::read_json(response).await
    }

    pub async fn delete_section(&self, name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["sections", name])?;
        info!("Deleting section {}", name);
        Self::check(self.http_client.delete(url).send().await?).await?;
        Ok(())
    }

    pub async fn rename_section(&self, name: &str, new_name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["sections", name])?;
        info!("Renaming section {} to {}", name, new_name);
        let request = RenameSectionRequest {
            new_name: new_name.to_string(),
        };
        Self::check(self.http_client.patch(url).json(&request).send().await?).await?;
        Ok(())
    }

    /// Возвращает имена созданных копий. Тело ответа необязательно:
    /// пустое или нераспознанное тело дает пустой список.
    pub async fn clone_section(
        &self,
        name: &str,
        count: usize,
    ) -> Result<Vec<String>, SeatingError> {
        let url = self.endpoint(&["sections", name, "clone"])?;
        info!("Cloning section {} x{}", name, count);
        let response = self
            .http_client
            .post(url)
            .query(&[("count", count)])
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str::<CloneResponse>(&body)
            .map(|cloned| cloned.created)
            .unwrap_or_default())
    }

    // === Места и ряды ===

    pub async fn add_seat(&self, section: &str, row: &str, seat: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["seats", section, row])?;
        debug!("POST {}", url);
        let request = SeatRequest {
            seat_number: seat.to_string(),
        };
        Self::check(self.http_client.post(url).json(&request).send().await?).await?;
        Ok(())
    }

    pub async fn delete_seat(
        &self,
        section: &str,
        row: &str,
        seat: &str,
    ) -> Result<(), SeatingError> {
        let url = self.endpoint(&["seats", section, row, seat])?;
        debug!("DELETE {}", url);
        Self::check(self.http_client.delete(url).send().await?).await?;
        Ok(())
    }

    pub async fn bulk_add_seats(
        &self,
        section: &str,
        row: &str,
        seat_numbers: &[String],
    ) -> Result<(), SeatingError> {
        let url = self.endpoint(&["sections", section, "rows", row, "bulk"])?;
        debug!("POST {} ({} seats)", url, seat_numbers.len());
        let request = BulkSeatsRequest {
            seat_numbers: seat_numbers.to_vec(),
        };
        Self::check(self.http_client.post(url).json(&request).send().await?).await?;
        Ok(())
    }

    /// Сервис сам разворачивает диапазон; после записи секция перечитывается,
    /// чтобы принять ровно то, что сервис сохранил.
    pub async fn apply_range(
        &self,
        section: &str,
        spec: &RangeSpec,
    ) -> Result<Section, SeatingError> {
        let url = self.endpoint(&["sections", section, "rows", "range"])?;
        info!(
            "Applying range to section {}: rows {}..{}, seats {}..{}",
            section, spec.start_row, spec.end_row, spec.start_seat, spec.end_seat
        );
        Self::check(self.http_client.post(url).json(spec).send().await?).await?;
        self.get_section(section).await
    }

    pub async fn delete_row(&self, section: &str, row: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["sections", section, "rows", row])?;
        debug!("DELETE {}", url);
        Self::check(self.http_client.delete(url).send().await?).await?;
        Ok(())
    }

    // === Проекты ===

    pub async fn list_projects(&self) -> Result<Vec<String>, SeatingError> {
        let url = self.endpoint(&["projects", "list"])?;
        let list: ProjectList = Self::read_json(self.http_client.get(url).send().await?).await?;
        Ok(list.projects)
    }

    pub async fn save_project(&self, name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["projects", "save"])?;
        info!("Saving project {}", name);
        let request = ProjectRequest {
            name: name.to_string(),
        };
        Self::check(self.http_client.post(url).json(&request).send().await?).await?;
        Ok(())
    }

    pub async fn load_project(&self, name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["projects", "load"])?;
        info!("Loading project {}", name);
        let request = ProjectRequest {
            name: name.to_string(),
        };
        Self::check(self.http_client.post(url).json(&request).send().await?).await?;
        Ok(())
    }

    pub async fn new_project(&self, name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["projects", "new", name])?;
        Self::check(self.http_client.post(url).send().await?).await?;
        Ok(())
    }

    pub async fn delete_project(&self, name: &str) -> Result<(), SeatingError> {
        let url = self.endpoint(&["projects", name])?;
        Self::check(self.http_client.delete(url).send().await?).await?;
        Ok(())
    }
}

impl SeatingBackend for ApiClient {
    async fn fetch_section(&self, name: &str) -> Result<Section, SeatingError> {
        self.get_section(name).await
    }

    async fn add_seat(&self, section: &str, address: &SeatAddress) -> Result<(), SeatingError> {
        ApiClient::add_seat(self, section, &address.row, &address.seat).await
    }

    async fn delete_seat(&self, section: &str, address: &SeatAddress) -> Result<(), SeatingError> {
        ApiClient::delete_seat(self, section, &address.row, &address.seat).await
    }

    async fn add_seats(
        &self,
        section: &str,
        row: &str,
        seats: &[String],
    ) -> Result<(), SeatingError> {
        self.bulk_add_seats(section, row, seats).await
    }

    async fn delete_row(&self, section: &str, row: &str) -> Result<(), SeatingError> {
        ApiClient::delete_row(self, section, row).await
    }

    async fn apply_range(&self, section: &str, spec: &RangeSpec) -> Result<Section, SeatingError> {
        ApiClient::apply_range(self, section, spec).await
    }
}
