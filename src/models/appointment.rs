//! Appointment model tying a pet and a user to a scheduled visit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentType {
    Checkup,
    Vaccination,
    Grooming,
    Surgery,
    Emergency,
    Dental,
    Other,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Checkup => "Checkup",
            AppointmentType::Vaccination => "Vaccination",
            AppointmentType::Grooming => "Grooming",
            AppointmentType::Surgery => "Surgery",
            AppointmentType::Emergency => "Emergency",
            AppointmentType::Dental => "Dental",
            AppointmentType::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Checkup" => Some(AppointmentType::Checkup),
            "Vaccination" => Some(AppointmentType::Vaccination),
            "Grooming" => Some(AppointmentType::Grooming),
            "Surgery" => Some(AppointmentType::Surgery),
            "Emergency" => Some(AppointmentType::Emergency),
            "Dental" => Some(AppointmentType::Dental),
            "Other" => Some(AppointmentType::Other),
            _ => None,
        }
    }
}

/// Appointment lifecycle status.
///
/// Intended flow: Pending -> Confirmed/Rejected, Confirmed -> Completed,
/// Cancelled from any non-terminal state. Adjacency is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(AppointmentStatus::Pending),
            "Confirmed" => Some(AppointmentStatus::Confirmed),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            "Rejected" => Some(AppointmentStatus::Rejected),
            _ => None,
        }
    }
}

/// An appointment. Pet and user display fields are denormalized at
/// creation time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub pet_species: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub date: String,
    pub time: String,
    pub veterinarian: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating an appointment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "type")]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for the status transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Request body for editing appointment details. Only provided fields
/// are changed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "type")]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Counts per status for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub rejected: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["Pending", "Confirmed", "Completed", "Cancelled", "Rejected"] {
            assert_eq!(AppointmentStatus::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(AppointmentStatus::from_str("pending"), None);
    }

    #[test]
    fn test_type_round_trip() {
        for s in [
            "Checkup",
            "Vaccination",
            "Grooming",
            "Surgery",
            "Emergency",
            "Dental",
            "Other",
        ] {
            assert_eq!(AppointmentType::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(AppointmentType::from_str("Walk"), None);
    }
}
