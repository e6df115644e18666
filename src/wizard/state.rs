//! Wizard state machine: tracks which step the coach is on and the
//! profile collected so far.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{CoachProfile, ProfileField};

/// The steps of the registration wizard.
///
/// Progresses linearly in both directions: PersonalInfo ⇄ Location ⇄
/// ProfessionalProfile ⇄ ClientInvitation. There is no terminal step; the
/// wizard is left through a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalInfo,
    Location,
    ProfessionalProfile,
    ClientInvitation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::PersonalInfo,
        Self::Location,
        Self::ProfessionalProfile,
        Self::ClientInvitation,
    ];

    pub const FIRST: WizardStep = Self::PersonalInfo;
    pub const LAST: WizardStep = Self::ClientInvitation;

    /// Number of declared steps.
    pub const COUNT: u8 = Self::ALL.len() as u8;

    /// 1-based position of this step.
    pub fn number(&self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::Location => 2,
            Self::ProfessionalProfile => 3,
            Self::ClientInvitation => 4,
        }
    }

    /// Look up a step by its 1-based position.
    pub fn from_number(n: u8) -> Option<WizardStep> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Informations personnelles",
            Self::Location => "Localisation",
            Self::ProfessionalProfile => "Profil professionnel",
            Self::ClientInvitation => "Invitation des élèves",
        }
    }

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        self.number().abs_diff(target.number()) == 1
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<WizardStep> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any.
    pub fn previous(&self) -> Option<WizardStep> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Profile fields shown on this step.
    pub fn fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|f| f.step() == *self)
            .collect()
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PersonalInfo => "personal_info",
            Self::Location => "location",
            Self::ProfessionalProfile => "professional_profile",
            Self::ClientInvitation => "client_invitation",
        };
        write!(f, "{s}")
    }
}

/// State owned by one wizard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    /// Identifies the session in logs.
    pub session_id: Uuid,
    /// Current step.
    pub current_step: WizardStep,
    /// Aggregated inputs from every step.
    pub profile: CoachProfile,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            current_step: WizardStep::FIRST,
            profile: CoachProfile::default(),
        }
    }
}

impl WizardState {
    /// Move forward one step. Stays put on the last step.
    ///
    /// Does not look at field completeness.
    pub fn advance(&mut self) -> WizardStep {
        self.move_to(self.current_step.next())
    }

    /// Move back one step. Stays put on the first step.
    pub fn retreat(&mut self) -> WizardStep {
        self.move_to(self.current_step.previous())
    }

    /// Only adjacent steps are reachable; anything else leaves the step as is.
    fn move_to(&mut self, target: Option<WizardStep>) -> WizardStep {
        match target {
            Some(target) if self.current_step.can_transition_to(target) => {
                self.current_step = target;
            }
            Some(target) => {
                tracing::warn!(from = %self.current_step, to = %target, "Rejected non-adjacent step change");
            }
            None => {}
        }
        self.current_step
    }

    pub fn is_first(&self) -> bool {
        self.current_step == WizardStep::FIRST
    }

    pub fn is_last(&self) -> bool {
        self.current_step == WizardStep::LAST
    }

    /// "Étape n sur N".
    pub fn progress_label(&self) -> String {
        format!(
            "Étape {} sur {}",
            self.current_step.number(),
            WizardStep::COUNT
        )
    }

    /// Merge a free-text input into the profile.
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        self.profile.set(field, value.into());
    }

    /// Merge a selector's value into the profile. Same merge as [`set_field`](Self::set_field).
    pub fn set_select_field(&mut self, field: ProfileField, value: impl Into<String>) {
        self.profile.set(field, value.into());
    }

    /// Copy of the full profile.
    pub fn snapshot(&self) -> CoachProfile {
        self.profile.clone()
    }

    /// Required fields of the current step that are still empty.
    ///
    /// Advisory: `advance` ignores this.
    pub fn missing_required(&self) -> Vec<ProfileField> {
        self.profile
            .missing_required()
            .into_iter()
            .filter(|f| f.step() == self.current_step)
            .collect()
    }
}
