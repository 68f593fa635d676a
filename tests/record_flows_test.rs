//! End-to-end flows over the public API with a canned backend: browse,
//! edit, create, and related-record navigation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use vtiger_cli::api::{ModuleDescriptor, RecordDetail, RecordService};
use vtiger_cli::draft::DraftRecord;
use vtiger_cli::fields::{Field, FieldType, Record};
use vtiger_cli::projection::{ModuleDataset, SortOrder, StatusBucket, TableRow};
use vtiger_cli::related::{RelatedNavigator, RelatedPayload, RelatedState};

fn ticket(id: &str, title: &str, status: &str) -> Record {
    Record::new(vec![
        Field::new("id", "Id", FieldType::String, id),
        Field::new("ticket_title", "Title", FieldType::String, title),
        Field::new("ticketstatus", "Status", FieldType::Picklist, status),
        Field::new("createdtime", "Created Time", FieldType::Datetime, "2024-03-01 08:00:00"),
    ])
}

fn contact_record() -> Record {
    Record::new(vec![
        Field::new("id", "Id", FieldType::String, "4x11"),
        Field::new("lastname", "Last Name", FieldType::String, "Doe").mandatory(),
        Field::new("email", "Email", FieldType::Email, "doe@example.com").mandatory(),
        Field::new("phone", "Phone", FieldType::Phone, "+32 2 555 0101"),
        Field::new("modifiedby", "Modified By", FieldType::Owner, "19x5"),
        Field::new("modifiedtime", "Modified Time", FieldType::Datetime, "2024-03-01 08:00:00"),
    ])
}

fn contact_schema() -> Vec<Field> {
    vec![
        Field::new("lastname", "Last Name", FieldType::String, "").mandatory(),
        Field::new("email", "Email", FieldType::Email, ""),
        Field::new("phone", "Phone", FieldType::Phone, ""),
    ]
}

/// Canned backend that records every write it receives.
#[derive(Default)]
struct FakeCrm {
    saved: Mutex<Vec<(String, String, HashMap<String, String>)>>,
    created: Mutex<Vec<(String, HashMap<String, String>)>>,
}

#[async_trait]
impl RecordService for FakeCrm {
    async fn list_modules(&self) -> Result<Vec<ModuleDescriptor>> {
        Ok(vec![
            ModuleDescriptor::for_name("HelpDesk"),
            ModuleDescriptor::for_name("Contacts"),
        ])
    }

    async fn list_records(&self, module: &str) -> Result<Vec<Record>> {
        if module != "HelpDesk" {
            bail!("Unknown module {}", module);
        }
        Ok(vec![
            ticket("14x1", "Item 1", "Open"),
            ticket("14x2", "Item 2", "Closed"),
            ticket("14x3", "Item 3", "Cancelled"),
        ])
    }

    async fn get_record(&self, module: &str, record_id: &str) -> Result<RecordDetail> {
        if module != "Contacts" || record_id != "4x11" {
            bail!("No such record {} {}", module, record_id);
        }
        let mut related = BTreeMap::new();
        related.insert(
            "HelpDesk".to_string(),
            RelatedPayload::Records(vec![ticket("14x1", "Item 1", "Open")]),
        );
        Ok(RecordDetail {
            record: contact_record(),
            related,
        })
    }

    async fn get_related_records(
        &self,
        _module: &str,
        _record_id: &str,
        related_module: &str,
    ) -> Result<RelatedPayload> {
        match related_module {
            "HelpDesk" => Ok(RelatedPayload::Records(vec![ticket(
                "14x1", "Item 1", "Open",
            )])),
            "Documents" => Ok(RelatedPayload::Records(Vec::new())),
            "Invoice" => Ok(RelatedPayload::Denied(
                "Permission to perform the operation is denied".to_string(),
            )),
            other => bail!("Related module {} does not exist", other),
        }
    }

    async fn update_record(
        &self,
        module: &str,
        record_id: &str,
        fields: &HashMap<String, String>,
    ) -> Result<()> {
        self.saved.lock().unwrap().push((
            module.to_string(),
            record_id.to_string(),
            fields.clone(),
        ));
        Ok(())
    }

    async fn create_record(
        &self,
        module: &str,
        fields: &HashMap<String, String>,
    ) -> Result<String> {
        self.created
            .lock()
            .unwrap()
            .push((module.to_string(), fields.clone()));
        Ok("4x99".to_string())
    }

    async fn get_module_fields(&self, module: &str) -> Result<Vec<Field>> {
        if module != "Contacts" {
            bail!("Unknown module {}", module);
        }
        Ok(contact_schema())
    }
}

#[test]
fn search_isolates_one_item_and_sort_orders_titles() {
    let records = vec![
        ticket("14x1", "Item 1", "Open"),
        ticket("14x2", "Item 2", "Closed"),
        ticket("14x3", "Item 3", "Cancelled"),
    ];
    let mut dataset = ModuleDataset::new(records);

    dataset.options.search_text = "item 2".to_string();
    let projected = dataset.projected();
    assert_eq!(projected.len(), 1);
    assert_eq!(projected[0].id(), Some("14x2"));

    dataset.options.search_text.clear();
    dataset.options.sort_key = "ticket_title".to_string();
    dataset.options.sort_order = SortOrder::Asc;
    let titles: Vec<&str> = dataset
        .projected()
        .iter()
        .map(|r| r.field("ticket_title").map(|f| f.value.as_str()).unwrap_or(""))
        .collect();
    assert_eq!(titles, vec!["Item 1", "Item 2", "Item 3"]);
}

#[tokio::test]
async fn browse_flow_projects_and_buckets_statuses() -> Result<()> {
    let crm = FakeCrm::default();
    let records = crm.list_records("HelpDesk").await?;
    let dataset = ModuleDataset::new(records);

    // Default ordering is id descending.
    let projected = dataset.projected();
    assert_eq!(projected[0].id(), Some("14x3"));
    assert_eq!(projected[2].id(), Some("14x1"));

    let buckets: Vec<StatusBucket> = projected
        .iter()
        .map(|r| TableRow::build(r).status.map(|(_, b)| b).unwrap())
        .collect();
    assert_eq!(
        buckets,
        vec![
            StatusBucket::Error,   // Cancelled
            StatusBucket::Success, // Closed
            StatusBucket::Warning, // Open
        ]
    );
    Ok(())
}

#[tokio::test]
async fn edit_flow_blocks_invalid_email_then_saves() -> Result<()> {
    let crm = FakeCrm::default();
    let detail = crm.get_record("Contacts", "4x11").await?;

    let mut draft = DraftRecord::new(&detail.record);
    draft.set_field("email", "not-an-email")?;

    assert!(draft.has_changes());
    assert!(!draft.validate_all());
    let errors = &draft.errors()["email"];
    assert_eq!(errors, &vec!["Please enter a valid email address".to_string()]);
    assert!(crm.saved.lock().unwrap().is_empty());

    draft.set_field("email", "jane.doe@example.com")?;
    assert!(draft.validate_all());

    let submission = draft.build_submission("19x1");
    crm.update_record("Contacts", "4x11", &submission).await?;

    let saved = crm.saved.lock().unwrap();
    let (module, record_id, fields) = &saved[0];
    assert_eq!(module, "Contacts");
    assert_eq!(record_id, "4x11");
    assert_eq!(fields["email"], "jane.doe@example.com");
    // Untouched fields travel unchanged; the submission is the full map.
    assert_eq!(fields["lastname"], "Doe");
    assert_eq!(fields["phone"], "+32 2 555 0101");
    // Stamps land because the record carries both fields.
    assert_eq!(fields["modifiedby"], "19x1");
    assert_ne!(fields["modifiedtime"], "2024-03-01 08:00:00");
    Ok(())
}

#[tokio::test]
async fn untouched_draft_reports_no_changes() -> Result<()> {
    let crm = FakeCrm::default();
    let detail = crm.get_record("Contacts", "4x11").await?;

    let draft = DraftRecord::new(&detail.record);
    assert!(!draft.has_changes());
    assert!(crm.saved.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_flow_enforces_mandatory_fields_from_schema() -> Result<()> {
    let crm = FakeCrm::default();
    let schema = crm.get_module_fields("Contacts").await?;

    let mut draft = DraftRecord::for_new(&schema);
    assert!(!draft.validate_all());
    assert_eq!(
        draft.errors()["lastname"],
        vec!["Last Name is required".to_string()]
    );

    draft.set_field("lastname", "Smith")?;
    assert!(draft.validate_all());

    let id = crm
        .create_record("Contacts", &draft.build_submission(""))
        .await?;
    assert_eq!(id, "4x99");

    let created = crm.created.lock().unwrap();
    let (module, fields) = &created[0];
    assert_eq!(module, "Contacts");
    assert_eq!(fields["lastname"], "Smith");
    assert_eq!(fields["email"], "");
    Ok(())
}

#[tokio::test]
async fn related_panels_distinguish_ready_empty_failed() -> Result<()> {
    let crm = FakeCrm::default();
    let mut navigator = RelatedNavigator::new();

    let state = navigator.open(&crm, "Contacts", "4x11", "HelpDesk").await;
    let RelatedState::Ready(dataset) = state else {
        panic!("expected Ready, got {state:?}");
    };
    assert_eq!(dataset.len(), 1);

    let state = navigator.open(&crm, "Contacts", "4x11", "Documents").await;
    assert!(matches!(state, RelatedState::Empty));

    let state = navigator.open(&crm, "Contacts", "4x11", "Invoice").await;
    let RelatedState::Failed(message) = state else {
        panic!("expected Failed, got {state:?}");
    };
    assert_eq!(message, "Permission to perform the operation is denied");

    let state = navigator.open(&crm, "Contacts", "4x11", "Quotes").await;
    assert!(matches!(state, RelatedState::Failed(_)));

    navigator.close("4x11", "Invoice");
    assert!(matches!(
        navigator.state("4x11", "Invoice"),
        RelatedState::NotAsked
    ));
    Ok(())
}
