//! Read-model handed to the rendering layer.

use serde::Serialize;

use super::invitation::{InvitationMode, InvitationState};
use super::model::{FieldKind, ProfileField, Specialty};
use super::state::{WizardState, WizardStep};

/// One selectable choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<&Specialty> for OptionView {
    fn from(s: &Specialty) -> Self {
        Self {
            value: s.value(),
            label: s.label(),
        }
    }
}

/// One input of the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: ProfileField,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
}

/// Invitation panel shown on the last step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationView {
    pub mode: InvitationMode,
    /// Present in link mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Present in email mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_email_target: Option<String>,
    pub is_submitting: bool,
}

/// In-flight flags owned by the wizard, copied into the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingFlags {
    /// A profile submission is awaiting its sink.
    pub submission: bool,
    /// An invitation send is awaiting its sink.
    pub invitation: bool,
}

/// Everything the renderer needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: WizardStep,
    pub number: u8,
    pub total: u8,
    pub title: &'static str,
    pub progress: String,
    pub fields: Vec<FieldView>,
    /// Required fields on this step that are still empty. Advisory only.
    pub missing_required: Vec<ProfileField>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<InvitationView>,
}

impl StepView {
    pub fn build(wizard: &WizardState, invitation: &InvitationState, pending: PendingFlags) -> Self {
        let step = wizard.current_step;
        let fields = step
            .fields()
            .into_iter()
            .map(|field| FieldView {
                field,
                label: field.label(),
                kind: field.kind(),
                required: field.required(),
                value: wizard.profile.get(field).to_string(),
                options: field.options().iter().map(OptionView::from).collect(),
            })
            .collect();

        let invitation = wizard.is_last().then(|| InvitationView {
            mode: invitation.mode,
            link: (invitation.mode == InvitationMode::Link)
                .then(|| invitation.generated_link.clone()),
            pending_email_target: (invitation.mode == InvitationMode::Email)
                .then(|| invitation.pending_email_target.clone()),
            is_submitting: pending.invitation,
        });

        Self {
            step,
            number: step.number(),
            total: WizardStep::COUNT,
            title: step.title(),
            progress: wizard.progress_label(),
            fields,
            missing_required: wizard.missing_required(),
            is_first: wizard.is_first(),
            is_last: wizard.is_last(),
            is_submitting: pending.submission,
            invitation,
        }
    }
}
