//! Adoption workflow endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, require_field, success, ApiResult};
use crate::auth::{self, AuthUser};
use crate::errors::AppError;
use crate::models::{
    AdoptionApplication, ApplicantDetails, ApplicationFilter, ApplicationStatus,
    CreateApplicationRequest, HousingType, HoursAlone, OwnOrRent, Pet,
    UpdateApplicationStatusRequest,
};
use crate::AppState;

/// POST /api/adoption/applications - Submit an adoption application.
///
/// Public: prospective adopters are not required to hold an account.
pub async fn submit_application(
    State(state): State<AppState>,
    Json(request): Json<CreateApplicationRequest>,
) -> ApiResult<AdoptionApplication> {
    let pet_id = require_field(&request.pet_id, "Pet ID is required")?;
    let details = validate_applicant(&request)?;

    let pet = state
        .repo
        .get_pet(pet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet not found".to_string()))?;

    if !pet.available_for_adoption {
        return Err(AppError::Conflict(
            "This pet is no longer available for adoption".to_string(),
        ));
    }

    let application = state.repo.create_application(&pet, &details).await?;
    tracing::info!(
        "Adoption application {} submitted for pet {}",
        application.application_id,
        pet.id
    );
    created(application)
}

/// GET /api/adoption/applications?status=&petId= - List applications
/// (admin only), newest submissions first.
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<ApplicationFilter>,
) -> ApiResult<Vec<AdoptionApplication>> {
    auth::require_admin(&state.repo, &auth).await?;

    let status = match filter.status.as_deref() {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };

    let applications = state
        .repo
        .list_applications(status, filter.pet_id.as_deref())
        .await?;
    success(applications)
}

/// PUT /api/adoption/applications/:id - Transition an application's
/// status (admin only). Approval cascades onto the pet.
pub async fn update_application_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> ApiResult<AdoptionApplication> {
    let caller = auth::require_admin(&state.repo, &auth).await?;

    let status = parse_status(request.status.as_deref().unwrap_or_default())?;

    let application = state
        .repo
        .update_application_status(&id, status, request.review_notes.as_deref(), &caller.id)
        .await?;

    tracing::info!(
        "Application {} moved to {}",
        application.application_id,
        status.as_str()
    );
    success(application)
}

/// DELETE /api/adoption/applications/:id - Delete an application (admin
/// only). No cascade to pet state.
pub async fn delete_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    auth::require_admin(&state.repo, &auth).await?;

    state.repo.delete_application(&id).await?;
    success(())
}

/// GET /api/adoption/stats - Application counts by pet species (admin
/// only).
pub async fn adoption_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<BTreeMap<String, i64>> {
    auth::require_admin(&state.repo, &auth).await?;

    let stats = state.repo.adoption_stats().await?;
    success(stats)
}

/// GET /api/adoption/available-pets - Pets currently listed for
/// adoption.
pub async fn available_pets(State(state): State<AppState>) -> ApiResult<Vec<Pet>> {
    let pets = state.repo.list_available_pets().await?;
    success(pets)
}

fn parse_status(s: &str) -> Result<ApplicationStatus, AppError> {
    ApplicationStatus::from_str(s).ok_or_else(|| {
        AppError::BadRequest(
            "Invalid status. Must be pending, under_review, approved, rejected, or completed"
                .to_string(),
        )
    })
}

fn validate_applicant(request: &CreateApplicationRequest) -> Result<ApplicantDetails, AppError> {
    let full_name = require_field(&request.full_name, "Full name is required")?;
    let email = require_field(&request.email, "Email is required")?;
    let phone = require_field(&request.phone, "Phone is required")?;
    let address = require_field(&request.address, "Address is required")?;
    let housing_type = require_field(&request.housing_type, "Housing type is required")?;
    let own_or_rent = require_field(&request.own_or_rent, "Own or rent is required")?;
    let household_members =
        require_field(&request.household_members, "Household members is required")?;
    let pet_experience = require_field(&request.pet_experience, "Pet experience is required")?;
    let hours_alone = require_field(&request.hours_alone, "Hours alone is required")?;

    let housing_type = HousingType::from_str(housing_type)
        .ok_or_else(|| AppError::Validation(format!("Invalid housing type: {:?}", housing_type)))?;
    let own_or_rent = OwnOrRent::from_str(own_or_rent)
        .ok_or_else(|| AppError::Validation(format!("Invalid own or rent: {:?}", own_or_rent)))?;
    let hours_alone = HoursAlone::from_str(hours_alone)
        .ok_or_else(|| AppError::Validation(format!("Invalid hours alone: {:?}", hours_alone)))?;

    if !request.agreement.unwrap_or(false) {
        return Err(AppError::Validation(
            "Adoption agreement must be accepted".to_string(),
        ));
    }

    Ok(ApplicantDetails {
        full_name: full_name.to_string(),
        email: email.to_lowercase(),
        phone: phone.to_string(),
        address: address.to_string(),
        housing_type,
        own_or_rent,
        household_members: household_members.to_string(),
        pet_experience: pet_experience.to_string(),
        hours_alone,
        agreement: true,
    })
}
