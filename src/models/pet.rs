//! Pet record model with embedded medical sub-records.

use serde::{Deserialize, Serialize};

/// Supported pet species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Fish,
    Rabbit,
    Other,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "Dog",
            Species::Cat => "Cat",
            Species::Bird => "Bird",
            Species::Fish => "Fish",
            Species::Rabbit => "Rabbit",
            Species::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Dog" => Some(Species::Dog),
            "Cat" => Some(Species::Cat),
            "Bird" => Some(Species::Bird),
            "Fish" => Some(Species::Fish),
            "Rabbit" => Some(Species::Rabbit),
            "Other" => Some(Species::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Unknown" => Some(Gender::Unknown),
            _ => None,
        }
    }
}

/// Adoption state of a pet. Absent means the pet was never listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionState {
    Available,
    Adopted,
}

impl AdoptionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionState::Available => "available",
            AdoptionState::Adopted => "adopted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(AdoptionState::Available),
            "adopted" => Some(AdoptionState::Adopted),
            _ => None,
        }
    }
}

/// Owner contact details embedded on the pet record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl OwnerContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

/// One entry in the pet's medical history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Legacy embedded appointment entry. The standalone appointments
/// collection is the canonical scheduling record; this array survives on
/// older pet documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A pet record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: Species,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerContact>,
    pub medical_history: Vec<MedicalRecord>,
    pub vaccinations: Vec<Vaccination>,
    pub medications: Vec<Medication>,
    pub appointments: Vec<PetAppointment>,
    pub available_for_adoption: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adoption_status: Option<AdoptionState>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a pet. Species and gender arrive as strings
/// and are validated against the enums at the boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerContact>,
    #[serde(default)]
    pub medical_history: Option<Vec<MedicalRecord>>,
    #[serde(default)]
    pub vaccinations: Option<Vec<Vaccination>>,
    #[serde(default)]
    pub medications: Option<Vec<Medication>>,
    #[serde(default)]
    pub appointments: Option<Vec<PetAppointment>>,
    #[serde(default)]
    pub available_for_adoption: Option<bool>,
    #[serde(default)]
    pub adoption_status: Option<String>,
}

/// Request body for updating a pet. Only provided fields are changed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerContact>,
    #[serde(default)]
    pub medical_history: Option<Vec<MedicalRecord>>,
    #[serde(default)]
    pub vaccinations: Option<Vec<Vaccination>>,
    #[serde(default)]
    pub medications: Option<Vec<Medication>>,
    #[serde(default)]
    pub appointments: Option<Vec<PetAppointment>>,
    #[serde(default)]
    pub available_for_adoption: Option<bool>,
    #[serde(default)]
    pub adoption_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_round_trip() {
        for s in ["Dog", "Cat", "Bird", "Fish", "Rabbit", "Other"] {
            assert_eq!(Species::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(Species::from_str("Dragon"), None);
    }

    #[test]
    fn test_adoption_state_round_trip() {
        assert_eq!(
            AdoptionState::from_str("adopted"),
            Some(AdoptionState::Adopted)
        );
        assert_eq!(
            AdoptionState::from_str("available"),
            Some(AdoptionState::Available)
        );
        assert_eq!(AdoptionState::from_str("pending"), None);
    }
}
