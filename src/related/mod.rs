//! Related-record navigation.
//!
//! A record detail view exposes one panel per related module. Each panel
//! is fetched lazily the first time it is opened and tracked through an
//! explicit lifecycle so the caller can render loading, empty, failed and
//! ready outcomes without guessing. Access denials arrive as a terminal
//! [`RelatedState::Failed`], never as an empty dataset.

use std::collections::HashMap;

use anyhow::Result;

use crate::api::RecordService;
use crate::projection::ModuleDataset;

pub mod shape;

pub use shape::{normalize_related, RelatedPayload};

/// Lifecycle of one related-records panel.
#[derive(Debug, Clone)]
pub enum RelatedState {
    /// The panel has never been opened.
    NotAsked,
    /// A fetch is in flight.
    Loading,
    /// Records arrived and are ready to project.
    Ready(ModuleDataset),
    /// The fetch succeeded but the backend holds no records here.
    Empty,
    /// Terminal failure with a user-facing message. Covers both transport
    /// errors and access denials; retry goes back through [`RelatedNavigator::refresh`].
    Failed(String),
}

impl RelatedState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RelatedState::NotAsked | RelatedState::Loading)
    }
}

static NOT_ASKED: RelatedState = RelatedState::NotAsked;

/// Panels are keyed per parent record so two records' related lists never
/// bleed into each other.
pub type RelatedKey = (String, String);

/// Tracks every related panel opened from record detail views.
///
/// Nothing is cached across parent records beyond what the caller keeps
/// alive; `clear` models navigating away from the detail view entirely.
#[derive(Default)]
pub struct RelatedNavigator {
    states: HashMap<RelatedKey, RelatedState>,
}

impl RelatedNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a panel, `NotAsked` if it was never opened.
    pub fn state(&self, parent_record_id: &str, related_module: &str) -> &RelatedState {
        self.states
            .get(&(parent_record_id.to_string(), related_module.to_string()))
            .unwrap_or(&NOT_ASKED)
    }

    /// Opens a panel: marks it loading, fetches, then records the outcome.
    pub async fn open(
        &mut self,
        service: &dyn RecordService,
        parent_module: &str,
        parent_record_id: &str,
        related_module: &str,
    ) -> &RelatedState {
        let key = (parent_record_id.to_string(), related_module.to_string());
        log::debug!(
            "Loading {} related to {} record {}",
            related_module,
            parent_module,
            parent_record_id
        );
        self.states.insert(key.clone(), RelatedState::Loading);
        let outcome = service
            .get_related_records(parent_module, parent_record_id, related_module)
            .await;
        self.states.insert(key.clone(), classify(outcome));
        self.states.get(&key).unwrap_or(&NOT_ASKED)
    }

    /// Re-runs the fetch for a panel, passing through `Loading` again.
    /// This is the retry path for `Failed` panels and the refresh path
    /// for everything else.
    pub async fn refresh(
        &mut self,
        service: &dyn RecordService,
        parent_module: &str,
        parent_record_id: &str,
        related_module: &str,
    ) -> &RelatedState {
        self.open(service, parent_module, parent_record_id, related_module)
            .await
    }

    /// Drops a panel's state so the next open starts from scratch.
    pub fn close(&mut self, parent_record_id: &str, related_module: &str) {
        self.states
            .remove(&(parent_record_id.to_string(), related_module.to_string()));
    }

    /// Drops everything, e.g. when leaving the parent record's detail view.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Mutable access to a ready panel's dataset, for search/sort/expansion.
    pub fn dataset_mut(
        &mut self,
        parent_record_id: &str,
        related_module: &str,
    ) -> Option<&mut ModuleDataset> {
        match self
            .states
            .get_mut(&(parent_record_id.to_string(), related_module.to_string()))
        {
            Some(RelatedState::Ready(dataset)) => Some(dataset),
            _ => None,
        }
    }
}

fn classify(outcome: Result<RelatedPayload>) -> RelatedState {
    match outcome {
        Ok(RelatedPayload::Denied(message)) => RelatedState::Failed(message),
        Ok(RelatedPayload::Records(records)) if records.is_empty() => RelatedState::Empty,
        Ok(RelatedPayload::Records(records)) => RelatedState::Ready(ModuleDataset::new(records)),
        Err(error) => RelatedState::Failed(format!("{error:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ModuleDescriptor, RecordDetail};
    use crate::fields::{Field, FieldType, Record};
    use anyhow::bail;
    use async_trait::async_trait;

    enum Canned {
        Records(Vec<Record>),
        Denied(String),
        Broken(String),
    }

    struct StubService {
        responses: HashMap<String, Canned>,
    }

    impl StubService {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn with(mut self, related_module: &str, canned: Canned) -> Self {
            self.responses.insert(related_module.to_string(), canned);
            self
        }
    }

    #[async_trait]
    impl RecordService for StubService {
        async fn list_modules(&self) -> Result<Vec<ModuleDescriptor>> {
            unimplemented!("not exercised")
        }

        async fn list_records(&self, _module: &str) -> Result<Vec<Record>> {
            unimplemented!("not exercised")
        }

        async fn get_record(&self, _module: &str, _record_id: &str) -> Result<RecordDetail> {
            unimplemented!("not exercised")
        }

        async fn get_related_records(
            &self,
            _module: &str,
            _record_id: &str,
            related_module: &str,
        ) -> Result<RelatedPayload> {
            match self.responses.get(related_module) {
                Some(Canned::Records(records)) => Ok(RelatedPayload::Records(records.clone())),
                Some(Canned::Denied(message)) => Ok(RelatedPayload::Denied(message.clone())),
                Some(Canned::Broken(message)) => bail!("{message}"),
                None => Ok(RelatedPayload::Records(Vec::new())),
            }
        }

        async fn update_record(
            &self,
            _module: &str,
            _record_id: &str,
            _fields: &HashMap<String, String>,
        ) -> Result<()> {
            unimplemented!("not exercised")
        }

        async fn create_record(
            &self,
            _module: &str,
            _fields: &HashMap<String, String>,
        ) -> Result<String> {
            unimplemented!("not exercised")
        }

        async fn get_module_fields(&self, _module: &str) -> Result<Vec<Field>> {
            unimplemented!("not exercised")
        }
    }

    fn contact(name: &str) -> Record {
        Record::new(vec![
            Field::new("id", "Id", FieldType::String, "12x9"),
            Field::new("lastname", "Last Name", FieldType::String, name),
        ])
    }

    #[test]
    fn unopened_panel_is_not_asked() {
        let navigator = RelatedNavigator::new();
        let state = navigator.state("3x42", "Contacts");
        assert!(matches!(state, RelatedState::NotAsked));
        assert!(!state.is_terminal());
    }

    #[tokio::test]
    async fn open_with_records_becomes_ready() {
        let service =
            StubService::new().with("Contacts", Canned::Records(vec![contact("Doe")]));
        let mut navigator = RelatedNavigator::new();

        let state = navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        assert!(state.is_terminal());
        match state {
            RelatedState::Ready(dataset) => assert_eq!(dataset.len(), 1),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn open_with_no_records_becomes_empty() {
        let service = StubService::new();
        let mut navigator = RelatedNavigator::new();

        let state = navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        assert!(matches!(state, RelatedState::Empty));
    }

    #[tokio::test]
    async fn denied_payload_becomes_failed_not_empty() {
        let service = StubService::new().with(
            "Invoice",
            Canned::Denied("Permission to perform the operation is denied".into()),
        );
        let mut navigator = RelatedNavigator::new();

        let state = navigator.open(&service, "Accounts", "3x42", "Invoice").await;
        match state {
            RelatedState::Failed(message) => {
                assert!(message.contains("denied"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error_becomes_failed() {
        let service =
            StubService::new().with("Contacts", Canned::Broken("connection reset".into()));
        let mut navigator = RelatedNavigator::new();

        let state = navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        assert!(matches!(state, RelatedState::Failed(_)));
    }

    #[tokio::test]
    async fn refresh_turns_failure_into_success() {
        let broken =
            StubService::new().with("Contacts", Canned::Broken("connection reset".into()));
        let healthy =
            StubService::new().with("Contacts", Canned::Records(vec![contact("Doe")]));
        let mut navigator = RelatedNavigator::new();

        navigator.open(&broken, "Accounts", "3x42", "Contacts").await;
        assert!(matches!(
            navigator.state("3x42", "Contacts"),
            RelatedState::Failed(_)
        ));

        let state = navigator
            .refresh(&healthy, "Accounts", "3x42", "Contacts")
            .await;
        assert!(matches!(state, RelatedState::Ready(_)));
    }

    #[tokio::test]
    async fn panels_are_keyed_per_parent_record() {
        let service =
            StubService::new().with("Contacts", Canned::Records(vec![contact("Doe")]));
        let mut navigator = RelatedNavigator::new();

        navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        assert!(matches!(
            navigator.state("3x42", "Contacts"),
            RelatedState::Ready(_)
        ));
        assert!(matches!(
            navigator.state("3x43", "Contacts"),
            RelatedState::NotAsked
        ));
    }

    #[tokio::test]
    async fn ready_panel_dataset_takes_projection_options() {
        let service = StubService::new().with(
            "Contacts",
            Canned::Records(vec![contact("Doe"), contact("Smith")]),
        );
        let mut navigator = RelatedNavigator::new();

        navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        let dataset = navigator.dataset_mut("3x42", "Contacts").unwrap();
        dataset.options.search_text = "smith".to_string();
        assert_eq!(dataset.projected().len(), 1);

        assert!(navigator.dataset_mut("3x42", "Invoice").is_none());
    }

    #[tokio::test]
    async fn close_resets_a_single_panel() {
        let service =
            StubService::new().with("Contacts", Canned::Records(vec![contact("Doe")]));
        let mut navigator = RelatedNavigator::new();

        navigator.open(&service, "Accounts", "3x42", "Contacts").await;
        navigator.open(&service, "Accounts", "3x42", "Invoice").await;
        navigator.close("3x42", "Contacts");

        assert!(matches!(
            navigator.state("3x42", "Contacts"),
            RelatedState::NotAsked
        ));
        assert!(matches!(
            navigator.state("3x42", "Invoice"),
            RelatedState::Empty
        ));
    }
}
