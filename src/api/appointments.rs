//! Appointment workflow endpoints. All routes require a bearer token.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{created, require_field, success, ApiResult};
use crate::auth::{self, AuthUser};
use crate::errors::AppError;
use crate::models::{
    Appointment, AppointmentStats, AppointmentStatus, AppointmentType, CreateAppointmentRequest,
    UpdateAppointmentRequest, UpdateAppointmentStatusRequest, User, UserRole,
};
use crate::AppState;

/// Default provider when the caller does not name one.
const DEFAULT_VETERINARIAN: &str = "Dr. Smith";

/// POST /api/appointments - Create an appointment for a pet.
pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateAppointmentRequest>,
) -> ApiResult<Appointment> {
    let user = auth::current_user(&state.repo, &auth).await?;

    let pet_id = require_field(&request.pet_id, "Pet ID is required")?;
    let date = require_field(&request.date, "Date is required")?;
    let time = require_field(&request.time, "Time is required")?;
    let kind = require_field(&request.appointment_type, "Type is required")?;
    let kind = AppointmentType::from_str(kind)
        .ok_or_else(|| AppError::Validation(format!("Invalid appointment type: {:?}", kind)))?;

    let pet = state
        .repo
        .get_pet(pet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet not found".to_string()))?;

    let veterinarian = request
        .veterinarian
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_VETERINARIAN);

    let appointment = state
        .repo
        .create_appointment(
            &pet,
            &user,
            kind,
            date,
            time,
            veterinarian,
            request.notes.as_deref(),
        )
        .await?;

    tracing::info!(
        "Appointment {} created for pet {} by user {}",
        appointment.id,
        pet.id,
        user.id
    );
    created(appointment)
}

/// GET /api/appointments - Admin sees all appointments; a regular user
/// sees only their own.
pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<Appointment>> {
    let user = auth::current_user(&state.repo, &auth).await?;

    let appointments = if user.role == UserRole::Admin {
        state.repo.list_appointments().await?
    } else {
        state.repo.list_appointments_for_user(&user.id).await?
    };
    success(appointments)
}

/// GET /api/appointments/:id - Get a single appointment (owner or admin
/// only).
pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Appointment> {
    let user = auth::current_user(&state.repo, &auth).await?;
    let appointment = fetch_owned(&state, &user, &id).await?;
    success(appointment)
}

/// PUT /api/appointments/:id/status - Transition an appointment's status
/// (owner or admin only).
pub async fn update_appointment_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> ApiResult<Appointment> {
    let user = auth::current_user(&state.repo, &auth).await?;

    let status = request.status.as_deref().unwrap_or_default();
    let status = AppointmentStatus::from_str(status)
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;

    fetch_owned(&state, &user, &id).await?;

    let appointment = state
        .repo
        .update_appointment_status(&id, status, request.admin_notes.as_deref(), &user.id)
        .await?;

    tracing::info!("Appointment {} moved to {}", id, status.as_str());
    success(appointment)
}

/// PUT /api/appointments/:id - Update appointment details (owner or
/// admin only).
pub async fn update_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> ApiResult<Appointment> {
    let user = auth::current_user(&state.repo, &auth).await?;
    fetch_owned(&state, &user, &id).await?;

    let appointment = state.repo.update_appointment(&id, &request).await?;
    success(appointment)
}

/// DELETE /api/appointments/:id - Delete an appointment (owner or admin
/// only).
pub async fn delete_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let user = auth::current_user(&state.repo, &auth).await?;
    fetch_owned(&state, &user, &id).await?;

    state.repo.delete_appointment(&id).await?;
    success(())
}

/// GET /api/appointments/stats/summary - Counts per status (admin only).
pub async fn appointment_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<AppointmentStats> {
    auth::require_admin(&state.repo, &auth).await?;

    let stats = state.repo.appointment_stats().await?;
    success(stats)
}

/// Fetch an appointment and enforce the owner-or-admin rule.
async fn fetch_owned(
    state: &AppState,
    user: &User,
    id: &str,
) -> Result<Appointment, AppError> {
    let appointment = state
        .repo
        .get_appointment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

    if user.role != UserRole::Admin && appointment.user_id != user.id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }
    Ok(appointment)
}
