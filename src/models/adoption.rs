//! Adoption application model and the review status lifecycle.

use serde::{Deserialize, Serialize};

/// Review status of an adoption application.
///
/// Intended flow: pending -> under_review -> approved/rejected ->
/// completed. Adjacency is policy, not enforced; any status may replace
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Completed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "under_review" => Some(ApplicationStatus::UnderReview),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            "completed" => Some(ApplicationStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    House,
    Apartment,
    Condo,
    Townhouse,
    Other,
}

impl HousingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::House => "house",
            HousingType::Apartment => "apartment",
            HousingType::Condo => "condo",
            HousingType::Townhouse => "townhouse",
            HousingType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "house" => Some(HousingType::House),
            "apartment" => Some(HousingType::Apartment),
            "condo" => Some(HousingType::Condo),
            "townhouse" => Some(HousingType::Townhouse),
            "other" => Some(HousingType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnOrRent {
    Own,
    Rent,
}

impl OwnOrRent {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnOrRent::Own => "own",
            OwnOrRent::Rent => "rent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "own" => Some(OwnOrRent::Own),
            "rent" => Some(OwnOrRent::Rent),
            _ => None,
        }
    }
}

/// How long the pet would routinely be left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursAlone {
    #[serde(rename = "0-4")]
    ZeroToFour,
    #[serde(rename = "4-8")]
    FourToEight,
    #[serde(rename = "8+")]
    EightPlus,
}

impl HoursAlone {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoursAlone::ZeroToFour => "0-4",
            HoursAlone::FourToEight => "4-8",
            HoursAlone::EightPlus => "8+",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "0-4" => Some(HoursAlone::ZeroToFour),
            "4-8" => Some(HoursAlone::FourToEight),
            "8+" => Some(HoursAlone::EightPlus),
            _ => None,
        }
    }
}

/// An adoption application.
///
/// Pet name and species are a snapshot taken at submission time so the
/// listing stays readable even after the pet record changes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionApplication {
    pub id: String,
    /// Human-readable identifier, e.g. APP-M3K9QZ-X7B2F.
    pub application_id: String,
    pub status: ApplicationStatus,
    pub pet_id: String,
    pub pet_name: String,
    pub pet_species: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub housing_type: HousingType,
    pub own_or_rent: OwnOrRent,
    pub household_members: String,
    pub pet_experience: String,
    pub hours_alone: HoursAlone,
    pub agreement: bool,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

/// Applicant fields after boundary validation, ready for persistence.
#[derive(Debug, Clone)]
pub struct ApplicantDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub housing_type: HousingType,
    pub own_or_rent: OwnOrRent,
    pub household_members: String,
    pub pet_experience: String,
    pub hours_alone: HoursAlone,
    pub agreement: bool,
}

/// Request body for submitting an application. Every field is optional at
/// the serde layer so missing values produce field-specific validation
/// errors rather than a blanket deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub housing_type: Option<String>,
    #[serde(default)]
    pub own_or_rent: Option<String>,
    #[serde(default)]
    pub household_members: Option<String>,
    #[serde(default)]
    pub pet_experience: Option<String>,
    #[serde(default)]
    pub hours_alone: Option<String>,
    #[serde(default)]
    pub agreement: Option<bool>,
}

/// Request body for the admin status transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// Query parameters for the admin application listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pet_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "under_review", "approved", "rejected", "completed"] {
            assert_eq!(ApplicationStatus::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(ApplicationStatus::from_str("archived"), None);
    }

    #[test]
    fn test_hours_alone_round_trip() {
        for s in ["0-4", "4-8", "8+"] {
            assert_eq!(HoursAlone::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(HoursAlone::from_str("12"), None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under_review\"");
    }
}
