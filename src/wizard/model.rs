//! Coach profile data model and per-field metadata.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

use super::state::WizardStep;

/// Every input the wizard collects, across all steps.
///
/// The set is closed: a profile always carries exactly one value per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Prenom,
    Nom,
    Email,
    Telephone,
    Adresse,
    VilleActivite,
    ClubPartenaire,
    Specialite,
    Experience,
    Certifications,
    DescriptionCoaching,
}

/// How the rendering layer should present a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
    Select,
}

impl ProfileField {
    /// All fields, in display order.
    pub const ALL: [ProfileField; 11] = [
        Self::Prenom,
        Self::Nom,
        Self::Email,
        Self::Telephone,
        Self::Adresse,
        Self::VilleActivite,
        Self::ClubPartenaire,
        Self::Specialite,
        Self::Experience,
        Self::Certifications,
        Self::DescriptionCoaching,
    ];

    /// Name used by the form and in the submitted payload.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Prenom => "prenom",
            Self::Nom => "nom",
            Self::Email => "email",
            Self::Telephone => "telephone",
            Self::Adresse => "adresse",
            Self::VilleActivite => "villeActivite",
            Self::ClubPartenaire => "clubPartenaire",
            Self::Specialite => "specialite",
            Self::Experience => "experience",
            Self::Certifications => "certifications",
            Self::DescriptionCoaching => "descriptionCoaching",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Prenom => "Prénom",
            Self::Nom => "Nom",
            Self::Email => "Adresse email",
            Self::Telephone => "Numéro de téléphone",
            Self::Adresse => "Adresse",
            Self::VilleActivite => "Ville d'activité",
            Self::ClubPartenaire => "Club partenaire (optionnel)",
            Self::Specialite => "Spécialité/Type de coaching",
            Self::Experience => "Expérience professionnelle",
            Self::Certifications => "Certifications et qualifications",
            Self::DescriptionCoaching => "Description du coaching",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Email => FieldKind::Email,
            Self::Telephone => FieldKind::Tel,
            Self::Specialite => FieldKind::Select,
            Self::Experience | Self::Certifications | Self::DescriptionCoaching => {
                FieldKind::TextArea
            }
            _ => FieldKind::Text,
        }
    }

    /// Whether the rendered input carries a `required` attribute.
    ///
    /// Informational only: the wizard never blocks on it.
    pub fn required(&self) -> bool {
        !matches!(self, Self::ClubPartenaire | Self::Specialite)
    }

    /// The step whose form shows this field.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Prenom | Self::Nom | Self::Email | Self::Telephone => WizardStep::PersonalInfo,
            Self::Adresse | Self::VilleActivite | Self::ClubPartenaire => WizardStep::Location,
            Self::Specialite
            | Self::Experience
            | Self::Certifications
            | Self::DescriptionCoaching => WizardStep::ProfessionalProfile,
        }
    }

    /// Choices offered by a select-style field; empty for free-text fields.
    pub fn options(&self) -> &'static [Specialty] {
        match self {
            Self::Specialite => &Specialty::ALL,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ProfileField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Coaching specialties offered by the `specialite` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Fitness,
    Nutrition,
    Yoga,
    CrossFit,
    Autre,
}

impl Specialty {
    pub const ALL: [Specialty; 5] = [
        Self::Fitness,
        Self::Nutrition,
        Self::Yoga,
        Self::CrossFit,
        Self::Autre,
    ];

    /// Value emitted by the selector.
    pub fn value(&self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Nutrition => "nutrition",
            Self::Yoga => "yoga",
            Self::CrossFit => "crossfit",
            Self::Autre => "autre",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fitness => "Fitness",
            Self::Nutrition => "Nutrition",
            Self::Yoga => "Yoga",
            Self::CrossFit => "CrossFit",
            Self::Autre => "Autre",
        }
    }
}

/// The aggregated coach profile.
///
/// Every declared field is always present; unset fields hold an empty string.
/// This is the payload handed to the submission sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachProfile {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub adresse: String,
    pub ville_activite: String,
    pub club_partenaire: String,
    pub specialite: String,
    pub experience: String,
    pub certifications: String,
    pub description_coaching: String,
}

impl CoachProfile {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Prenom => &self.prenom,
            ProfileField::Nom => &self.nom,
            ProfileField::Email => &self.email,
            ProfileField::Telephone => &self.telephone,
            ProfileField::Adresse => &self.adresse,
            ProfileField::VilleActivite => &self.ville_activite,
            ProfileField::ClubPartenaire => &self.club_partenaire,
            ProfileField::Specialite => &self.specialite,
            ProfileField::Experience => &self.experience,
            ProfileField::Certifications => &self.certifications,
            ProfileField::DescriptionCoaching => &self.description_coaching,
        }
    }

    /// Replace one field's value, leaving every other field untouched.
    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Prenom => &mut self.prenom,
            ProfileField::Nom => &mut self.nom,
            ProfileField::Email => &mut self.email,
            ProfileField::Telephone => &mut self.telephone,
            ProfileField::Adresse => &mut self.adresse,
            ProfileField::VilleActivite => &mut self.ville_activite,
            ProfileField::ClubPartenaire => &mut self.club_partenaire,
            ProfileField::Specialite => &mut self.specialite,
            ProfileField::Experience => &mut self.experience,
            ProfileField::Certifications => &mut self.certifications,
            ProfileField::DescriptionCoaching => &mut self.description_coaching,
        };
        *slot = value;
    }

    /// Iterate `(field, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        ProfileField::ALL.into_iter().map(|field| (field, self.get(field)))
    }

    /// Required fields that are still empty (whitespace counts as empty).
    pub fn missing_required(&self) -> Vec<ProfileField> {
        self.iter()
            .filter(|(field, value)| field.required() && value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }
}
