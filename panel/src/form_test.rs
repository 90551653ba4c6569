use super::*;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use tokio::time::{Duration, timeout};

// =============================================================
// Mock store
// =============================================================

#[derive(Clone, Copy)]
enum Reply {
    Ok,
    Status(u16),
    Network,
}

impl Reply {
    fn into_result(self) -> Result<(), StoreError> {
        match self {
            Self::Ok => Ok(()),
            Self::Status(status) => Err(StoreError::Status { status }),
            Self::Network => Err(StoreError::Request("connection refused".into())),
        }
    }
}

struct MockStore {
    payload: SettingsPayload,
    load_reply: Reply,
    save_reply: Reply,
    loads: AtomicUsize,
    bodies: Mutex<Vec<String>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockStore {
    fn new(payload: Value) -> Self {
        Self {
            payload: serde_json::from_value(payload).expect("payload should decode"),
            load_reply: Reply::Ok,
            save_reply: Reply::Ok,
            loads: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn failing_load(reply: Reply) -> Self {
        Self { load_reply: reply, ..Self::new(json!({})) }
    }

    fn with_save_reply(mut self, reply: Reply) -> Self {
        self.save_reply = reply;
        self
    }

    /// Saves signal `entered` and then wait for `release`.
    fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().expect("bodies mutex should lock").clone()
    }
}

#[async_trait::async_trait]
impl SettingsStore for MockStore {
    async fn load(&self) -> Result<SettingsPayload, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.load_reply.into_result().map(|()| self.payload.clone())
    }

    async fn save(&self, record: &SettingsRecord) -> Result<(), StoreError> {
        let body = serde_json::to_string(record).expect("record should serialize");
        self.bodies.lock().expect("bodies mutex should lock").push(body);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.save_reply.into_result()
    }
}

fn ready_form() -> SettingsForm {
    let mut form = SettingsForm::new();
    form.finish_load(Ok(SettingsPayload::default()));
    form
}

// =============================================================
// Loading
// =============================================================

#[test]
fn new_form_is_loading_with_placeholder() {
    let form = SettingsForm::new();
    assert!(form.is_loading());
    assert!(form.record().is_none());
    assert_eq!(form.view(), FormView::Loading { placeholder: "Loading..." });
    assert_eq!(form.view().to_string(), "Loading...\n");
}

#[tokio::test]
async fn mount_issues_exactly_one_read() {
    let controller = FormController::mount(MockStore::new(json!({}))).await;
    controller.load().await;
    controller.load().await;
    assert_eq!(controller.store().loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mount_with_full_response_uses_response_values() {
    let store = MockStore::new(json!({ "keywords": "ransomware", "article_count": 40, "refresh_minutes": 5 }));
    let controller = FormController::mount(store).await;
    let record = controller.record().await.unwrap();
    assert_eq!(record, SettingsRecord { keywords: "ransomware".into(), article_count: 40, refresh_minutes: 5 });
}

#[tokio::test]
async fn mount_with_partial_response_fills_read_defaults() {
    let cases = [
        (json!({}), ("", 10, 30)),
        (json!({ "keywords": "x" }), ("x", 10, 30)),
        (json!({ "article_count": 3 }), ("", 3, 30)),
        (json!({ "refresh_minutes": 120 }), ("", 10, 120)),
        (json!({ "keywords": "y", "refresh_minutes": 1 }), ("y", 10, 1)),
    ];
    for (payload, (keywords, count, minutes)) in cases {
        let controller = FormController::mount(MockStore::new(payload.clone())).await;
        let record = controller.record().await.unwrap();
        assert_eq!(record.keywords, keywords, "payload {payload}");
        assert_eq!(record.article_count, count, "payload {payload}");
        assert_eq!(record.refresh_minutes, minutes, "payload {payload}");
    }
}

#[tokio::test]
async fn failed_load_falls_back_to_builtin_defaults_silently() {
    for reply in [Reply::Status(500), Reply::Status(404), Reply::Network] {
        let controller = FormController::mount(MockStore::failing_load(reply)).await;
        let record = controller.record().await.unwrap();
        assert_eq!(record.keywords, "cybersecurity, malware, phishing");
        assert_eq!(record.article_count, 12);
        assert_eq!(record.refresh_minutes, 30);
        assert!(controller.status().await.is_none());
    }
}

#[test]
fn decode_failure_falls_back_to_builtin_defaults() {
    let mut form = SettingsForm::new();
    form.finish_load(Err(StoreError::Decode("expected object".into())));
    assert_eq!(form.record(), Some(&SettingsRecord::builtin()));
}

#[test]
fn load_keeps_valid_fields_beside_unusable_numbers() {
    for body in [
        r#"{"keywords":"ransomware","article_count":12.0}"#,
        r#"{"keywords":"ransomware","article_count":-5}"#,
        r#"{"keywords":"ransomware","article_count":4294967296}"#,
    ] {
        let mut form = SettingsForm::new();
        form.finish_load(serde_json::from_str::<SettingsPayload>(body).map_err(|e| StoreError::Decode(e.to_string())));
        let record = form.record().unwrap();
        assert_eq!(record.keywords, "ransomware", "body {body}");
        assert_eq!(record.refresh_minutes, 30, "body {body}");
    }
}

#[test]
fn late_load_result_is_ignored_once_ready() {
    let mut form = ready_form();
    form.edit(Field::Keywords, "edited").unwrap();
    form.finish_load(Err(StoreError::Status { status: 500 }));
    assert_eq!(form.record().unwrap().keywords, "edited");
}

// =============================================================
// Field edits
// =============================================================

#[test]
fn edit_while_loading_is_rejected() {
    let mut form = SettingsForm::new();
    assert_eq!(form.edit(Field::Keywords, "x"), Err(EditError::NotReady));
}

#[test]
fn edit_keywords_is_stored_verbatim() {
    let mut form = ready_form();
    form.edit(Field::Keywords, "  Malware,, ransomware ").unwrap();
    assert_eq!(form.record().unwrap().keywords, "  Malware,, ransomware ");
}

#[test]
fn edit_numeric_fields_parses_numbers() {
    let mut form = ready_form();
    form.edit(Field::ArticleCount, "25").unwrap();
    form.edit(Field::RefreshMinutes, " 90 ").unwrap();
    let record = form.record().unwrap();
    assert_eq!(record.article_count, 25);
    assert_eq!(record.refresh_minutes, 90);
}

#[test]
fn edit_invalid_number_keeps_previous_value() {
    let mut form = ready_form();
    for input in ["", "abc", "12.5", "-3"] {
        let err = form.edit(Field::ArticleCount, input).unwrap_err();
        assert_eq!(err, EditError::InvalidNumber { field: Field::ArticleCount, input: input.to_owned() });
    }
    assert_eq!(form.record().unwrap().article_count, 10);
}

#[test]
fn edit_out_of_range_number_passes_through() {
    let mut form = ready_form();
    form.edit(Field::ArticleCount, "500").unwrap();
    form.edit(Field::RefreshMinutes, "0").unwrap();
    let record = form.record().unwrap();
    assert_eq!(record.article_count, 500);
    assert_eq!(record.refresh_minutes, 0);
}

// =============================================================
// Saving
// =============================================================

#[test]
fn save_while_loading_is_rejected() {
    let mut form = SettingsForm::new();
    assert_eq!(form.begin_save(), Err(SaveError::NotReady));
}

#[test]
fn begin_save_disables_submit_and_clears_status() {
    let mut form = ready_form();
    form.begin_save().unwrap();
    form.finish_save(Err(StoreError::Status { status: 500 }));
    assert_eq!(form.status(), Some("Error saving settings."));

    form.begin_save().unwrap();
    assert!(form.is_saving());
    assert_eq!(form.status(), None);
    assert_eq!(form.view().submit(), Some(SubmitView { label: "Saving...", enabled: false }));
    assert_eq!(form.begin_save(), Err(SaveError::InFlight));
}

#[tokio::test]
async fn save_success_sets_saved_message() {
    let controller = FormController::mount(MockStore::new(json!({}))).await;
    let outcome = controller.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(controller.status().await.as_deref(), Some("Settings saved."));
    assert_eq!(controller.view().await.submit(), Some(SubmitView { label: "Save settings", enabled: true }));
}

#[tokio::test]
async fn save_failure_sets_error_message() {
    for reply in [Reply::Status(500), Reply::Network] {
        let store = MockStore::new(json!({})).with_save_reply(reply);
        let controller = FormController::mount(store).await;
        let outcome = controller.save().await.unwrap();
        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(controller.status().await.as_deref(), Some("Error saving settings."));
        assert!(controller.view().await.submit().unwrap().enabled);
    }
}

#[tokio::test]
async fn save_submits_current_values_with_numeric_types() {
    let controller = FormController::mount(MockStore::new(json!({}))).await;
    controller.edit(Field::Keywords, "phishing, apt").await.unwrap();
    controller.edit(Field::ArticleCount, "7").await.unwrap();
    controller.edit(Field::RefreshMinutes, "60").await.unwrap();
    controller.save().await.unwrap();

    let bodies = controller.store().bodies();
    assert_eq!(bodies.len(), 1);
    let value: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(value, json!({ "keywords": "phishing, apt", "article_count": 7, "refresh_minutes": 60 }));
    assert!(value["article_count"].is_number());
    assert!(value["refresh_minutes"].is_number());
}

#[tokio::test]
async fn saving_twice_sends_identical_bodies() {
    let controller = FormController::mount(MockStore::new(json!({ "keywords": "k" }))).await;
    controller.save().await.unwrap();
    controller.save().await.unwrap();

    let bodies = controller.store().bodies();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn in_flight_save_shows_saving_and_refuses_second_save() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let store = MockStore::new(json!({})).gated(entered.clone(), release.clone());
    let controller = FormController::mount(store).await;

    let background = controller.clone();
    let handle = tokio::spawn(async move { background.save().await });

    timeout(Duration::from_millis(500), entered.notified())
        .await
        .expect("save should reach the store");

    let view = controller.view().await;
    assert_eq!(view.submit(), Some(SubmitView { label: "Saving...", enabled: false }));
    assert_eq!(view.status(), None);
    assert_eq!(controller.save().await, Err(SaveError::InFlight));

    release.notify_one();
    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(controller.store().bodies().len(), 1);
    assert_eq!(controller.view().await.submit(), Some(SubmitView { label: "Save settings", enabled: true }));
}

// =============================================================
// Rendering
// =============================================================

#[test]
fn ready_view_lists_fields_in_order() {
    let form = ready_form();
    let FormView::Ready { fields, .. } = form.view() else {
        panic!("form should be ready");
    };
    let labels: Vec<&str> = fields.iter().map(|f| f.label).collect();
    assert_eq!(labels, vec!["Keywords (comma separated)", "Articles to show", "Refresh interval (minutes)"]);
    assert_eq!(fields[1].range, Some(1..=50));
    assert_eq!(fields[2].range, Some(1..=180));
    assert_eq!(fields[0].range, None);
}

#[test]
fn ready_view_renders_as_text() {
    let mut form = ready_form();
    form.edit(Field::Keywords, "malware").unwrap();
    form.begin_save().unwrap();
    form.finish_save(Ok(()));

    let text = form.view().to_string();
    assert_eq!(
        text,
        "Keywords (comma separated): malware\n\
         Articles to show: 10 (1-50)\n\
         Refresh interval (minutes): 30 (1-180)\n\
         [Save settings]\n\
         Settings saved.\n"
    );
}

#[test]
fn saving_view_renders_disabled_control() {
    let mut form = ready_form();
    form.begin_save().unwrap();
    assert!(form.view().to_string().contains("[Saving...] (disabled)"));
}

#[test]
fn view_field_lookup_returns_current_value() {
    let form = ready_form();
    let view = form.view();
    assert_eq!(view.field(Field::ArticleCount).map(|f| f.value.as_str()), Some("10"));
}
