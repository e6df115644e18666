//! RegistrationWizard coordinates step state, the profile, the invitation
//! sub-flow, and the external sinks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::{InvitationError, SubmissionError};
use crate::sinks::{Clipboard, InvitationSink, Navigator, SubmissionSink};

use super::invitation::{InvitationMode, InvitationState};
use super::model::{CoachProfile, ProfileField};
use super::state::{WizardState, WizardStep};
use super::view::{PendingFlags, StepView};

/// Collaborators a wizard session talks to.
#[derive(Clone)]
pub struct WizardDeps {
    pub submission: Arc<dyn SubmissionSink>,
    pub invitation: Arc<dyn InvitationSink>,
    pub clipboard: Arc<dyn Clipboard>,
    pub navigator: Arc<dyn Navigator>,
}

/// One registration wizard session.
///
/// Step moves and field edits complete without suspending. Only `submit` and
/// `send_invite` await, and neither holds a lock across the sink call, so the
/// renderer can read `view()` while either is pending.
///
/// The two in-flight flags live outside the locks so they can be cleared from
/// `Drop` when a pending call is cancelled or its sink panics.
pub struct RegistrationWizard {
    deps: WizardDeps,
    dashboard_route: String,
    state: RwLock<WizardState>,
    invitation: RwLock<InvitationState>,
    submitting: AtomicBool,
    inviting: AtomicBool,
}

/// Holds a flag set for as long as it lives.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RegistrationWizard {
    pub fn new(
        deps: WizardDeps,
        invite_link: impl Into<String>,
        dashboard_route: impl Into<String>,
    ) -> Self {
        let state = WizardState::default();
        tracing::info!(session_id = %state.session_id, "Registration wizard started");
        Self {
            deps,
            dashboard_route: dashboard_route.into(),
            state: RwLock::new(state),
            invitation: RwLock::new(InvitationState::new(invite_link)),
            submitting: AtomicBool::new(false),
            inviting: AtomicBool::new(false),
        }
    }

    // ── Step controller ─────────────────────────────────────────────

    pub async fn current_step(&self) -> WizardStep {
        self.state.read().await.current_step
    }

    pub async fn advance(&self) -> WizardStep {
        let mut state = self.state.write().await;
        let from = state.current_step;
        let to = state.advance();
        if from == to {
            tracing::debug!(step = %to, "Already on last step");
        } else {
            tracing::debug!(session_id = %state.session_id, %from, %to, "Advanced");
        }
        to
    }

    pub async fn retreat(&self) -> WizardStep {
        let mut state = self.state.write().await;
        let from = state.current_step;
        let to = state.retreat();
        if from == to {
            tracing::debug!(step = %to, "Already on first step");
        } else {
            tracing::debug!(session_id = %state.session_id, %from, %to, "Went back");
        }
        to
    }

    pub async fn is_first(&self) -> bool {
        self.state.read().await.is_first()
    }

    pub async fn is_last(&self) -> bool {
        self.state.read().await.is_last()
    }

    // ── Profile aggregator ──────────────────────────────────────────

    pub async fn set_field(&self, field: ProfileField, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.set_field(field, value);
        tracing::debug!(%field, "Field updated");
    }

    pub async fn set_select_field(&self, field: ProfileField, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.set_select_field(field, value);
        tracing::debug!(%field, "Selection updated");
    }

    pub async fn snapshot(&self) -> CoachProfile {
        self.state.read().await.snapshot()
    }

    /// True only while a profile submission is pending.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Submit the profile and, once accepted, navigate to the dashboard.
    ///
    /// Only valid on the last step. The submitting flag is cleared however the
    /// call ends, including when this future is dropped before the sink
    /// settles. A sink failure is returned unchanged and leaves the profile and
    /// step untouched.
    pub async fn submit(&self) -> Result<(), SubmissionError> {
        let (session_id, profile, in_flight) = {
            let state = self.state.read().await;
            if !state.is_last() {
                tracing::warn!(
                    step = %state.current_step,
                    "Submission attempted before the last step"
                );
                return Err(SubmissionError::NotOnFinalStep {
                    current: state.current_step.number(),
                    last: WizardStep::LAST.number(),
                });
            }
            let in_flight = InFlight::start(&self.submitting);
            (state.session_id, state.snapshot(), in_flight)
        };

        tracing::info!(%session_id, sink = self.deps.submission.name(), "Submitting coach profile");
        let result = self.deps.submission.submit(&profile).await;
        drop(in_flight);

        match result {
            Ok(()) => {
                tracing::info!(%session_id, destination = %self.dashboard_route, "Coach profile accepted");
                self.deps.navigator.navigate(&self.dashboard_route);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%session_id, "Coach profile submission failed: {}", e);
                Err(e.into())
            }
        }
    }

    // ── Invitation sub-flow ─────────────────────────────────────────

    pub async fn invitation(&self) -> InvitationState {
        self.invitation.read().await.clone()
    }

    /// True only while an invitation send is pending.
    pub fn is_inviting(&self) -> bool {
        self.inviting.load(Ordering::SeqCst)
    }

    pub async fn set_invitation_mode(&self, mode: InvitationMode) {
        self.invitation.write().await.set_mode(mode);
        tracing::debug!(%mode, "Invitation mode changed");
    }

    pub async fn set_pending_email_target(&self, value: impl Into<String>) {
        self.invitation.write().await.set_pending_email_target(value);
    }

    /// Send an invitation to the pending email target.
    ///
    /// Only valid on the last step in email mode. The step, the mode and the
    /// target are read together, so a concurrent `retreat()` either lands
    /// before the check or after the send has started. The target is cleared
    /// after the sink accepts it and kept after a failure so it can be retried.
    pub async fn send_invite(&self) -> Result<(), InvitationError> {
        let (target, in_flight) = {
            let state = self.state.read().await;
            let invitation = self.invitation.read().await;
            ensure_invitation_step(&state)?;
            ensure_mode(&invitation, InvitationMode::Email)?;
            (invitation.pending_email_target.clone(), InFlight::start(&self.inviting))
        };

        tracing::info!(to = %target, sink = self.deps.invitation.name(), "Sending invitation");
        let result = self.deps.invitation.send_invite(&target).await;

        let mut invitation = self.invitation.write().await;
        drop(in_flight);
        match result {
            Ok(()) => {
                invitation.mark_sent();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(to = %target, "Invitation failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Hand the invitation link to the clipboard. Only valid in link mode.
    pub async fn copy_link(&self) -> Result<(), InvitationError> {
        let state = self.state.read().await;
        let invitation = self.invitation.read().await;
        ensure_invitation_step(&state)?;
        ensure_mode(&invitation, InvitationMode::Link)?;
        self.deps.clipboard.copy(&invitation.generated_link);
        tracing::debug!("Invitation link copied");
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Build the read-model for the current step.
    pub async fn view(&self) -> StepView {
        let state = self.state.read().await;
        let invitation = self.invitation.read().await;
        let pending = PendingFlags {
            submission: self.is_submitting(),
            invitation: self.is_inviting(),
        };
        StepView::build(&state, &invitation, pending)
    }
}

fn ensure_invitation_step(state: &WizardState) -> Result<(), InvitationError> {
    if !state.is_last() {
        tracing::warn!(step = %state.current_step, "Invitation used before the last step");
        return Err(InvitationError::NotOnInvitationStep {
            current: state.current_step.number(),
            last: WizardStep::LAST.number(),
        });
    }
    Ok(())
}

fn ensure_mode(invitation: &InvitationState, expected: InvitationMode) -> Result<(), InvitationError> {
    if invitation.mode != expected {
        tracing::warn!(mode = %invitation.mode, %expected, "Invitation action not available in this mode");
        return Err(InvitationError::ModeMismatch {
            expected: expected.to_string(),
            actual: invitation.mode.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::error::SinkError;
    use crate::sinks::{MemoryClipboard, RecordingNavigator};

    /// Submission sink returning a fixed outcome and counting calls.
    struct StubSubmission {
        fail: bool,
        calls: AtomicUsize,
        last: Mutex<Option<CoachProfile>>,
    }

    impl StubSubmission {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SubmissionSink for StubSubmission {
        fn name(&self) -> &str {
            "stub"
        }

        async fn submit(&self, profile: &CoachProfile) -> Result<(), SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(profile.clone());
            if self.fail {
                Err(SinkError::Rejected {
                    sink: "stub".into(),
                    reason: "email already registered".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct StubInvitation {
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl StubInvitation {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl InvitationSink for StubInvitation {
        fn name(&self) -> &str {
            "stub"
        }

        async fn send_invite(&self, email: &str) -> Result<(), SinkError> {
            self.sent.lock().unwrap().push(email.to_string());
            if self.fail {
                Err(SinkError::Transport {
                    sink: "stub".into(),
                    reason: "connection reset".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        wizard: RegistrationWizard,
        submission: Arc<StubSubmission>,
        invitation: Arc<StubInvitation>,
        clipboard: Arc<MemoryClipboard>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness(fail_submit: bool, fail_invite: bool) -> Harness {
        let submission = StubSubmission::new(fail_submit);
        let invitation = StubInvitation::new(fail_invite);
        let clipboard = Arc::new(MemoryClipboard::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let deps = WizardDeps {
            submission: submission.clone(),
            invitation: invitation.clone(),
            clipboard: clipboard.clone(),
            navigator: navigator.clone(),
        };
        Harness {
            wizard: RegistrationWizard::new(deps, "https://flexsync.com/invite/coach123", "/dashboard"),
            submission,
            invitation,
            clipboard,
            navigator,
        }
    }

    async fn go_to_last(wizard: &RegistrationWizard) {
        for _ in 0..3 {
            wizard.advance().await;
        }
    }

    #[tokio::test]
    async fn advance_three_times_reaches_last_and_stays() {
        let h = harness(false, false);
        go_to_last(&h.wizard).await;
        assert_eq!(h.wizard.current_step().await.number(), 4);
        assert_eq!(h.wizard.advance().await.number(), 4);
        assert!(h.wizard.is_last().await);
    }

    #[tokio::test]
    async fn retreat_from_first_is_noop() {
        let h = harness(false, false);
        assert_eq!(h.wizard.retreat().await, WizardStep::PersonalInfo);
        assert!(h.wizard.is_first().await);
    }

    #[tokio::test]
    async fn fields_merge_into_snapshot() {
        let h = harness(false, false);
        h.wizard.set_field(ProfileField::Prenom, "Marie").await;
        h.wizard.set_field(ProfileField::Nom, "Dupont").await;
        h.wizard.set_select_field(ProfileField::Specialite, "fitness").await;

        let snap = h.wizard.snapshot().await;
        assert_eq!(snap.prenom, "Marie");
        assert_eq!(snap.nom, "Dupont");
        assert_eq!(snap.specialite, "fitness");
        assert_eq!(snap.email, "");
    }

    #[tokio::test]
    async fn submit_success_navigates_once() {
        let h = harness(false, false);
        for field in ProfileField::ALL {
            h.wizard.set_field(field, format!("{field}-value")).await;
        }
        go_to_last(&h.wizard).await;

        h.wizard.submit().await.unwrap();

        assert!(!h.wizard.is_submitting());
        assert_eq!(h.navigator.visited(), vec!["/dashboard".to_string()]);
        assert_eq!(h.submission.calls.load(Ordering::SeqCst), 1);
        let sent = h.submission.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.ville_activite, "villeActivite-value");
    }

    #[tokio::test]
    async fn submit_failure_passes_error_through_and_resets_flag() {
        let h = harness(true, false);
        h.wizard.set_field(ProfileField::Email, "marie@example.com").await;
        go_to_last(&h.wizard).await;

        let err = h.wizard.submit().await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Sink(SinkError::Rejected {
                sink: "stub".into(),
                reason: "email already registered".into(),
            })
        );
        assert!(!h.wizard.is_submitting());
        assert!(h.navigator.visited().is_empty());
        assert!(h.wizard.is_last().await);
        assert_eq!(h.wizard.snapshot().await.email, "marie@example.com");
    }

    #[tokio::test]
    async fn submit_before_last_step_is_refused() {
        let h = harness(false, false);
        h.wizard.advance().await;

        let err = h.wizard.submit().await.unwrap_err();
        assert_eq!(err, SubmissionError::NotOnFinalStep { current: 2, last: 4 });
        assert_eq!(h.submission.calls.load(Ordering::SeqCst), 0);
        assert!(!h.wizard.is_submitting());
    }

    #[tokio::test]
    async fn send_invite_success_clears_target() {
        let h = harness(false, false);
        go_to_last(&h.wizard).await;
        h.wizard.set_invitation_mode(InvitationMode::Email).await;
        h.wizard.set_pending_email_target("a@b.com").await;

        h.wizard.send_invite().await.unwrap();

        let inv = h.wizard.invitation().await;
        assert_eq!(inv.pending_email_target, "");
        assert!(!h.wizard.is_inviting());
        assert_eq!(*h.invitation.sent.lock().unwrap(), vec!["a@b.com".to_string()]);
    }

    #[tokio::test]
    async fn send_invite_failure_keeps_target() {
        let h = harness(false, true);
        go_to_last(&h.wizard).await;
        h.wizard.set_invitation_mode(InvitationMode::Email).await;
        h.wizard.set_pending_email_target("a@b.com").await;

        let err = h.wizard.send_invite().await.unwrap_err();
        assert!(matches!(err, InvitationError::Sink(SinkError::Transport { .. })));

        let inv = h.wizard.invitation().await;
        assert_eq!(inv.pending_email_target, "a@b.com");
        assert!(!h.wizard.is_inviting());
    }

    #[tokio::test]
    async fn send_invite_in_link_mode_is_refused() {
        let h = harness(false, false);
        go_to_last(&h.wizard).await;
        h.wizard.set_pending_email_target("a@b.com").await;

        let err = h.wizard.send_invite().await.unwrap_err();
        assert_eq!(
            err,
            InvitationError::ModeMismatch {
                expected: "email".into(),
                actual: "link".into(),
            }
        );
        assert!(h.invitation.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invitation_unavailable_before_last_step() {
        let h = harness(false, false);
        h.wizard.set_invitation_mode(InvitationMode::Email).await;
        h.wizard.set_pending_email_target("a@b.com").await;

        let err = h.wizard.send_invite().await.unwrap_err();
        assert_eq!(err, InvitationError::NotOnInvitationStep { current: 1, last: 4 });
        assert!(matches!(
            h.wizard.copy_link().await,
            Err(InvitationError::NotOnInvitationStep { .. })
        ));
    }

    #[tokio::test]
    async fn copy_link_hands_link_to_clipboard() {
        let h = harness(false, false);
        go_to_last(&h.wizard).await;

        h.wizard.copy_link().await.unwrap();
        assert_eq!(
            h.clipboard.contents().as_deref(),
            Some("https://flexsync.com/invite/coach123")
        );

        h.wizard.set_invitation_mode(InvitationMode::Email).await;
        assert!(matches!(
            h.wizard.copy_link().await,
            Err(InvitationError::ModeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn invitation_is_not_part_of_profile() {
        let h = harness(false, false);
        go_to_last(&h.wizard).await;
        h.wizard.set_invitation_mode(InvitationMode::Email).await;
        h.wizard.set_pending_email_target("client@example.com").await;
        h.wizard.submit().await.unwrap();

        let sent = h.submission.last.lock().unwrap().clone().unwrap();
        let json = serde_json::to_string(&sent).unwrap();
        assert!(!json.contains("client@example.com"));
    }

    #[tokio::test]
    async fn view_reflects_step_and_flags() {
        let h = harness(false, false);
        let view = h.wizard.view().await;
        assert_eq!(view.number, 1);
        assert!(view.is_first);
        assert!(!view.is_submitting);

        go_to_last(&h.wizard).await;
        let view = h.wizard.view().await;
        assert!(view.is_last);
        assert!(view.invitation.is_some());
    }
}
