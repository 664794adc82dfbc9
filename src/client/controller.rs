//! Page controller: what happens when the sign-up forms are used

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::form::{FormField, FormKind, FormState, Submission};
use super::sink::RegistrationSink;

/// How long the success overlay stays up
pub const OVERLAY_DISMISS_DELAY: Duration = Duration::from_secs(5);

/// One line of a participant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub team_size: i64,
    pub email: String,
    submission: u64,
}

impl ListEntry {
    /// Display text, e.g. `Ada (3 members) ada@x.io`
    pub fn render(&self) -> String {
        format!("{} ({} members) {}", self.name, self.team_size, self.email)
    }
}

/// Where a click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the registration modal
    ModalBackdrop,
    /// Anything else on the page
    Elsewhere,
}

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing changed except the invalid marks
    Invalid(Vec<FormField>),
    /// Entry added and success overlay shown
    Registered { message: String },
    /// The remote sink refused; the local update was undone
    Rejected { message: String },
}

/// Everything visible on the page
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub main_form: FormState,
    pub modal_form: FormState,
    pub main_list: Vec<ListEntry>,
    pub modal_list: Vec<ListEntry>,
    /// Text of the success overlay while it is shown
    pub success_overlay: Option<String>,
    pub modal_open: bool,
    pub scroll_locked: bool,
    overlay_owner: Option<u64>,
    /// Submissions whose dismissal timer has not fired yet
    pending_dismissals: BTreeSet<u64>,
    next_submission: u64,
}

impl PageState {
    pub fn form(&self, kind: FormKind) -> &FormState {
        match kind {
            FormKind::Main => &self.main_form,
            FormKind::Modal => &self.modal_form,
        }
    }

    fn form_mut(&mut self, kind: FormKind) -> &mut FormState {
        match kind {
            FormKind::Main => &mut self.main_form,
            FormKind::Modal => &mut self.modal_form,
        }
    }

    fn append_everywhere(&mut self, entry: ListEntry) {
        self.main_list.push(entry.clone());
        self.modal_list.push(entry);
    }

    fn remove_everywhere(&mut self, submission: u64) {
        self.main_list.retain(|e| e.submission != submission);
        self.modal_list.retain(|e| e.submission != submission);
    }
}

/// Drives the page state in response to user actions
///
/// Local-only unless a [`RegistrationSink`] is attached. With a sink the
/// update is applied first and undone if the sink refuses it.
#[derive(Debug, Clone)]
pub struct PageController {
    state: Arc<Mutex<PageState>>,
    sink: Option<Arc<dyn RegistrationSink>>,
    dismiss_after: Duration,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState::default())),
            sink: None,
            dismiss_after: OVERLAY_DISMISS_DELAY,
        }
    }

    /// Forward validated submissions to a remote sink
    pub fn with_sink(mut self, sink: Arc<dyn RegistrationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Copy of the current page
    pub async fn snapshot(&self) -> PageState {
        self.state.lock().await.clone()
    }

    /// Type into a field
    pub async fn input(&self, kind: FormKind, field: FormField, value: impl Into<String>) {
        self.state.lock().await.form_mut(kind).set(field, value);
    }

    /// "Join now": show the registration modal
    pub async fn open_modal(&self) {
        let mut page = self.state.lock().await;
        page.modal_open = true;
        page.scroll_locked = true;
    }

    /// Close button of the registration modal
    pub async fn close_modal(&self) {
        let mut page = self.state.lock().await;
        page.modal_open = false;
        page.scroll_locked = false;
        page.modal_form.reset();
    }

    /// A click anywhere; only the modal backdrop does something
    pub async fn click(&self, target: ClickTarget) {
        let modal_open = self.state.lock().await.modal_open;

        if target == ClickTarget::ModalBackdrop && modal_open {
            self.close_modal().await;
        }
    }

    /// Submit one of the forms
    pub async fn submit(&self, kind: FormKind) -> SubmitOutcome {
        let (submission, id) = {
            let mut page = self.state.lock().await;

            let submission = match page.form_mut(kind).validate() {
                Ok(submission) => submission,
                Err(fields) => {
                    debug!(form = ?kind, ?fields, "Form has invalid fields");
                    return SubmitOutcome::Invalid(fields);
                }
            };

            let id = page.next_submission;
            page.next_submission += 1;

            page.append_everywhere(ListEntry {
                name: submission.name.clone(),
                team_size: submission.team_size,
                email: submission.email.clone(),
                submission: id,
            });
            page.success_overlay = Some(submission.confirmation());
            page.overlay_owner = Some(id);
            page.pending_dismissals.insert(id);
            page.scroll_locked = true;

            if kind == FormKind::Modal {
                page.modal_open = false;
            }

            (submission, id)
        };

        self.schedule_dismissal(kind, id);

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.submit(&submission).await {
                let message = e.to_string();
                self.roll_back(kind, id, &message).await;
                return SubmitOutcome::Rejected { message };
            }
        }

        info!(form = ?kind, email = %submission.email, "Participant added to page");

        SubmitOutcome::Registered {
            message: submission.confirmation(),
        }
    }

    /// One-shot: hide the overlay, restore scroll, reset the form
    fn schedule_dismissal(&self, kind: FormKind, id: u64) {
        let state = Arc::clone(&self.state);
        let delay = self.dismiss_after;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut page = state.lock().await;

            // Rolled back while waiting
            if !page.pending_dismissals.remove(&id) {
                return;
            }

            page.success_overlay = None;
            page.overlay_owner = None;
            page.scroll_locked = false;
            page.form_mut(kind).reset();
        });
    }

    async fn roll_back(&self, kind: FormKind, id: u64, message: &str) {
        warn!(form = ?kind, %message, "Registration refused, undoing local update");

        let mut page = self.state.lock().await;
        page.remove_everywhere(id);
        page.pending_dismissals.remove(&id);

        if page.overlay_owner == Some(id) {
            page.success_overlay = None;
            page.overlay_owner = None;
            page.scroll_locked = false;
        }

        if kind == FormKind::Modal {
            page.modal_open = true;
            page.scroll_locked = true;
        }

        page.form_mut(kind).error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::form::FormValues;
    use crate::client::sink::{HttpRegistrationSink, SinkError};

    async fn fill(controller: &PageController, kind: FormKind, values: FormValues) {
        controller.input(kind, FormField::Name, values.name).await;
        controller.input(kind, FormField::Email, values.email).await;
        controller.input(kind, FormField::Team, values.team).await;
    }

    #[derive(Debug)]
    struct RejectingSink;

    #[async_trait]
    impl RegistrationSink for RejectingSink {
        async fn submit(&self, _submission: &Submission) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                status: 400,
                message: "Email already registered!".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_main_form_success_then_dismissal() {
        let controller = PageController::new();
        fill(&controller, FormKind::Main, FormValues::new("Ada", "ada@x.io", "3")).await;

        let outcome = controller.submit(FormKind::Main).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Registered {
                message: "Thank you, Ada! Your team of 3 is registered.".to_string()
            }
        );

        let page = controller.snapshot().await;
        assert_eq!(page.main_list.len(), 1);
        assert_eq!(page.modal_list.len(), 1);
        assert_eq!(page.main_list[0].render(), "Ada (3 members) ada@x.io");
        assert!(page.success_overlay.is_some());
        assert!(page.scroll_locked);
        assert_eq!(page.main_form.values.name, "Ada");

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(controller.snapshot().await.success_overlay.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let page = controller.snapshot().await;
        assert!(page.success_overlay.is_none());
        assert!(!page.scroll_locked);
        assert_eq!(page.main_form, FormState::default());
        assert_eq!(page.main_list.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_form_success_closes_modal() {
        let controller = PageController::new();
        controller.open_modal().await;
        fill(&controller, FormKind::Modal, FormValues::new("Grace", "grace@x.io", "5")).await;

        controller.submit(FormKind::Modal).await;

        let page = controller.snapshot().await;
        assert!(!page.modal_open);
        assert!(page.scroll_locked);
        assert_eq!(page.main_list, page.modal_list);
    }

    #[tokio::test]
    async fn test_invalid_fields_are_marked_and_nothing_else_changes() {
        let controller = PageController::new();
        fill(&controller, FormKind::Main, FormValues::new("", "not-an-email", "0")).await;

        let outcome = controller.submit(FormKind::Main).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(vec![FormField::Name, FormField::Email, FormField::Team])
        );

        let page = controller.snapshot().await;
        assert!(page.main_list.is_empty());
        assert!(page.success_overlay.is_none());
        assert!(!page.scroll_locked);
        assert!(page.main_form.is_marked(FormField::Email));
        assert!(page.modal_form.invalid.is_empty());
    }

    #[tokio::test]
    async fn test_close_modal_resets_form_and_scroll() {
        let controller = PageController::new();
        controller.open_modal().await;
        controller
            .input(FormKind::Modal, FormField::Name, "Half typed")
            .await;

        controller.click(ClickTarget::Elsewhere).await;
        assert!(controller.snapshot().await.modal_open);

        controller.click(ClickTarget::ModalBackdrop).await;

        let page = controller.snapshot().await;
        assert!(!page.modal_open);
        assert!(!page.scroll_locked);
        assert_eq!(page.modal_form, FormState::default());

        controller.open_modal().await;
        controller.input(FormKind::Modal, FormField::Name, "Again").await;
        controller.close_modal().await;
        assert_eq!(controller.snapshot().await.modal_form.values.name, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_is_rolled_back() {
        let controller = PageController::new().with_sink(Arc::new(RejectingSink));
        controller.open_modal().await;
        fill(&controller, FormKind::Modal, FormValues::new("Ada", "ada@x.io", "3")).await;

        let outcome = controller.submit(FormKind::Modal).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                message: "Email already registered!".to_string()
            }
        );

        let page = controller.snapshot().await;
        assert!(page.main_list.is_empty());
        assert!(page.modal_list.is_empty());
        assert!(page.success_overlay.is_none());
        assert!(page.modal_open);
        assert_eq!(
            page.modal_form.error.as_deref(),
            Some("Email already registered!")
        );

        // The withdrawn overlay's timer must not wipe the message
        tokio::time::sleep(Duration::from_secs(6)).await;
        let page = controller.snapshot().await;
        assert_eq!(page.modal_form.values.name, "Ada");
        assert!(page.modal_form.error.is_some());
        assert!(page.pending_dismissals.is_empty());
    }

    #[derive(Debug)]
    struct SlowRejectingSink;

    #[async_trait]
    impl RegistrationSink for SlowRejectingSink {
        async fn submit(&self, _submission: &Submission) -> Result<(), SinkError> {
            tokio::time::sleep(OVERLAY_DISMISS_DELAY + Duration::from_secs(1)).await;
            Err(SinkError::Rejected {
                status: 400,
                message: "Email already registered!".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_after_dismissal_leaves_no_pending_state() {
        let controller = PageController::new().with_sink(Arc::new(SlowRejectingSink));
        fill(&controller, FormKind::Main, FormValues::new("Ada", "ada@x.io", "3")).await;

        let outcome = controller.submit(FormKind::Main).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));

        let page = controller.snapshot().await;
        assert!(page.main_list.is_empty());
        assert!(page.success_overlay.is_none());
        assert!(!page.scroll_locked);
        assert!(page.pending_dismissals.is_empty());
        assert_eq!(page.main_form.error.as_deref(), Some("Email already registered!"));
    }

    #[tokio::test]
    async fn test_accepted_by_remote_sink() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/participants"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpRegistrationSink::new(&server.uri()).unwrap();
        let controller = PageController::new().with_sink(Arc::new(sink));
        fill(&controller, FormKind::Main, FormValues::new("Ada", "ada@x.io", "3")).await;

        let outcome = controller.submit(FormKind::Main).await;

        assert!(matches!(outcome, SubmitOutcome::Registered { .. }));
        assert_eq!(controller.snapshot().await.main_list.len(), 1);
    }
}
