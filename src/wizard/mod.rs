//! Registration wizard for coach signup.
//!
//! A coach fills in four steps (personal details, location, professional
//! profile, client invitation). Field edits merge into one `CoachProfile`;
//! on the last step the profile is submitted and, once accepted, the coach
//! is sent to the dashboard. Client invitations run alongside on the last
//! step and never touch the profile.

pub mod invitation;
pub mod manager;
pub mod model;
pub mod state;
pub mod view;

pub use invitation::{InvitationMode, InvitationState};
pub use manager::{RegistrationWizard, WizardDeps};
pub use model::{CoachProfile, FieldKind, ProfileField, Specialty};
pub use state::{WizardState, WizardStep};
pub use view::{FieldView, InvitationView, OptionView, PendingFlags, StepView};
