//! Pet registry endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{created, require_field, success, ApiResult};
use crate::auth::{self, AuthUser};
use crate::errors::AppError;
use crate::models::{CreatePetRequest, Pet, UpdatePetRequest};
use crate::AppState;

/// GET /api/pets - List all pets, newest first.
pub async fn list_pets(State(state): State<AppState>) -> ApiResult<Vec<Pet>> {
    let pets = state.repo.list_pets().await?;
    success(pets)
}

/// GET /api/pets/:id - Get a single pet.
pub async fn get_pet(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Pet> {
    let pet = state
        .repo
        .get_pet(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", id)))?;
    success(pet)
}

/// POST /api/pets - Create a new pet (admin only).
pub async fn create_pet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreatePetRequest>,
) -> ApiResult<Pet> {
    auth::require_admin(&state.repo, &auth).await?;

    require_field(&request.name, "Name is required")?;
    require_field(&request.species, "Species is required")?;

    let pet = state.repo.create_pet(&request).await?;
    tracing::info!("Created pet {} ({})", pet.name, pet.id);
    created(pet)
}

/// PUT /api/pets/:id - Update a pet (admin only). Partial update of
/// provided fields only, including the medical sub-records.
pub async fn update_pet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePetRequest>,
) -> ApiResult<Pet> {
    auth::require_admin(&state.repo, &auth).await?;

    let pet = state.repo.update_pet(&id, &request).await?;
    success(pet)
}

/// DELETE /api/pets/:id - Delete a pet (admin only).
pub async fn delete_pet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    auth::require_admin(&state.repo, &auth).await?;

    state.repo.delete_pet(&id).await?;
    tracing::info!("Deleted pet {}", id);
    success(())
}
