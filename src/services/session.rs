//! session.rs
//!
//! Связка локального редактора с сервисом хранения.
//!
//! 1.  **Workspace**: владеет редактором открытой секции и счетчиком поколений.
//!     Каждое открытие секции начинает новое поколение, поэтому ответы на запросы,
//!     отправленные до переключения, распознаются как устаревшие.
//! 2.  **SyncedEditor**: двухфазная запись. Сначала вычисляется новое значение
//!     секции, затем выполняется запрос к сервису, и только потом значение либо
//!     подтверждается (со снимком в историю), либо сверяется с сервисом
//!     (перечитывается авторитетное состояние).
//!
//! Undo/redo остаются локальными и в сервис не отправляются.

use tracing::{debug, error, info, warn};

use crate::error::SeatingError;
use crate::models::range::RangeSpec;
use crate::models::seat::{validate_label, SeatAddress};
use crate::models::section::Section;
use crate::services::editor::SectionEditor;
use crate::services::range;

/// Удаленное хранилище секций. Реализуется HTTP-клиентом и тестовыми заглушками.
#[allow(async_fn_in_trait)]
pub trait SeatingBackend {
    async fn fetch_section(&self, name: &str) -> Result<Section, SeatingError>;

    async fn add_seat(&self, section: &str, address: &SeatAddress) -> Result<(), SeatingError>;

    async fn delete_seat(&self, section: &str, address: &SeatAddress) -> Result<(), SeatingError>;

    async fn add_seats(
        &self,
        section: &str,
        row: &str,
        seats: &[String],
    ) -> Result<(), SeatingError>;

    async fn delete_row(&self, section: &str, row: &str) -> Result<(), SeatingError>;

    /// Применяет диапазон на сервере и возвращает актуальное состояние секции.
    async fn apply_range(&self, section: &str, spec: &RangeSpec) -> Result<Section, SeatingError>;
}

/// Итог удаленной записи.
#[derive(Debug)]
pub enum Commit {
    /// Сервис подтвердил запись, локальное значение принято.
    Confirmed,
    /// Запись не прошла, локальное состояние заменено перечитанным с сервиса.
    Reconciled { cause: SeatingError },
}

impl Commit {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Commit::Confirmed)
    }
}

/// Метка запроса: к какой секции и к какому поколению относится ответ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    section: String,
}

impl Ticket {
    pub fn section(&self) -> &str {
        &self.section
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    editor: Option<SectionEditor>,
    generation: u64,
    max_history: Option<usize>,
}

impl Workspace {
    pub fn new(max_history: Option<usize>) -> Self {
        Self {
            editor: None,
            generation: 0,
            max_history,
        }
    }

    /// Переключение секции сбрасывает историю и выделение.
    pub fn open(&mut self, section: Section) -> Ticket {
        self.generation += 1;
        info!("Opened section {} (generation {})", section.name, self.generation);
        let ticket = Ticket {
            generation: self.generation,
            section: section.name.clone(),
        };
        self.editor = Some(SectionEditor::open(section, self.max_history));
        ticket
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.editor = None;
    }

    pub fn editor(&self) -> Option<&SectionEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut SectionEditor> {
        self.editor.as_mut()
    }

    pub fn current(&self) -> Result<&SectionEditor, SeatingError> {
        self.editor.as_ref().ok_or(SeatingError::NoSectionOpen)
    }

    pub fn current_mut(&mut self) -> Result<&mut SectionEditor, SeatingError> {
        self.editor.as_mut().ok_or(SeatingError::NoSectionOpen)
    }

    fn ticket_for_current(&self) -> Option<Ticket> {
        self.editor.as_ref().map(|editor| Ticket {
            generation: self.generation,
            section: editor.name().to_string(),
        })
    }

    pub fn ticket(&self) -> Result<Ticket, SeatingError> {
        self.ticket_for_current().ok_or(SeatingError::NoSectionOpen)
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
            && self
                .editor
                .as_ref()
                .is_some_and(|editor| editor.name() == ticket.section)
    }

    /// Принимает ответ сервиса без записи в историю, если он не устарел.
    pub fn accept(&mut self, ticket: &Ticket, section: Section) -> bool {
        if !self.is_current(ticket) || section.name != ticket.section {
            debug!("Discarding stale response for section {}", ticket.section);
            return false;
        }
        match self.editor.as_mut() {
            Some(editor) => {
                editor.adopt(section);
                true
            }
            None => false,
        }
    }

    /// Фиксирует новое значение со снимком в историю, если ответ не устарел.
    pub fn commit(&mut self, ticket: &Ticket, next: Section) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding stale commit for section {}", ticket.section);
            return false;
        }
        match self.editor.as_mut() {
            Some(editor) => {
                editor.commit(next);
                true
            }
            None => false,
        }
    }
}

/// Редактор, синхронизирующий каждую мутацию с сервисом хранения.
pub struct SyncedEditor<B> {
    backend: B,
    workspace: Workspace,
}

impl<B: SeatingBackend> SyncedEditor<B> {
    pub fn new(backend: B, max_history: Option<usize>) -> Self {
        Self {
            backend,
            workspace: Workspace::new(max_history),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn editor(&self) -> Result<&SectionEditor, SeatingError> {
        self.workspace.current()
    }

    pub async fn open_section(&mut self, name: &str) -> Result<Ticket, SeatingError> {
        let section = self.backend.fetch_section(name).await?;
        Ok(self.workspace.open(section))
    }

    /// Перечитывает открытую секцию. `false`, если ответ устарел.
    pub async fn refresh(&mut self) -> Result<bool, SeatingError> {
        let ticket = self.workspace.ticket()?;
        let section = self.backend.fetch_section(ticket.section()).await?;
        Ok(self.workspace.accept(&ticket, section))
    }

    async fn settle(
        &mut self,
        ticket: Ticket,
        next: Section,
        outcome: Result<(), SeatingError>,
    ) -> Result<Commit, SeatingError> {
        match outcome {
            Ok(()) => {
                self.workspace.commit(&ticket, next);
                Ok(Commit::Confirmed)
            }
            Err(cause) => self.reconcile(ticket, cause).await,
        }
    }

    /// Запись не прошла: перечитываем секцию и принимаем состояние сервиса.
    /// Если и чтение не удалось, локальное состояние не меняется.
    async fn reconcile(
        &mut self,
        ticket: Ticket,
        cause: SeatingError,
    ) -> Result<Commit, SeatingError> {
        warn!("Write to section {} failed: {}. Reconciling", ticket.section(), cause);
        match self.backend.fetch_section(ticket.section()).await {
            Ok(section) => {
                self.workspace.accept(&ticket, section);
                Ok(Commit::Reconciled { cause })
            }
            Err(fetch_error) => {
                error!(
                    "Failed to reconcile section {}: {}",
                    ticket.section(),
                    fetch_error
                );
                Err(cause)
            }
        }
    }

    pub async fn add_seat(&mut self, row: &str, seat: &str) -> Result<Commit, SeatingError> {
        let address = SeatAddress::new(row, seat)?;
        let mut next = self.workspace.current()?.section().clone();
        next.add_seat(&address);

        let ticket = self.workspace.ticket()?;
        let outcome = self.backend.add_seat(ticket.section(), &address).await;
        self.settle(ticket, next, outcome).await
    }

    pub async fn delete_seat(&mut self, row: &str, seat: &str) -> Result<Commit, SeatingError> {
        let address = SeatAddress::new(row, seat)?;
        let mut next = self.workspace.current()?.section().clone();
        next.delete_seat(&address);

        let ticket = self.workspace.ticket()?;
        let outcome = self.backend.delete_seat(ticket.section(), &address).await;
        self.settle(ticket, next, outcome).await
    }

    pub async fn add_seats(&mut self, row: &str, seats: &[String]) -> Result<Commit, SeatingError> {
        let mut next = self.workspace.current()?.section().clone();
        next.add_seats(row, seats)?;

        let ticket = self.workspace.ticket()?;
        let outcome = self.backend.add_seats(ticket.section(), row, seats).await;
        self.settle(ticket, next, outcome).await
    }

    pub async fn delete_row(&mut self, row: &str) -> Result<Commit, SeatingError> {
        validate_label("row", row)?;
        let mut next = self.workspace.current()?.section().clone();
        next.delete_row(row);

        let ticket = self.workspace.ticket()?;
        let outcome = self.backend.delete_row(ticket.section(), row).await;
        self.settle(ticket, next, outcome).await
    }

    /// Диапазон проверяется локально (ошибки - синхронно, без снимка),
    /// затем применяется сервером; принимается то, что сервер сохранил.
    pub async fn apply_range(&mut self, spec: &RangeSpec) -> Result<Commit, SeatingError> {
        let editor = self.workspace.current()?;
        range::generate(spec, &editor.section().row_labels())?;

        let ticket = self.workspace.ticket()?;
        match self.backend.apply_range(ticket.section(), spec).await {
            Ok(section) => {
                self.workspace.commit(&ticket, section);
                Ok(Commit::Confirmed)
            }
            Err(cause) => self.reconcile(ticket, cause).await,
        }
    }

    /// Двойной клик: добавляет место, только если ячейка пуста.
    pub async fn double_activate(
        &mut self,
        row: &str,
        seat: &str,
    ) -> Result<Option<Commit>, SeatingError> {
        if self.workspace.current()?.has_seat(row, seat) {
            return Ok(None);
        }
        self.add_seat(row, seat).await.map(Some)
    }

    pub fn activate(&mut self, row: &str, seat: &str) -> Result<bool, SeatingError> {
        self.workspace.current_mut()?.activate(row, seat)
    }

    pub fn undo(&mut self) -> bool {
        self.workspace.editor_mut().is_some_and(|editor| editor.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.workspace.editor_mut().is_some_and(|editor| editor.redo())
    }
}
