//! Database repository for CRUD operations.
//!
//! All handlers go through this type; it owns the SQL and the row
//! conversions. The adoption approval cascade is the one multi-entity
//! write and runs inside a transaction with a compare-and-swap on the
//! pet's availability.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AdoptionApplication, AdoptionState, ApplicantDetails, ApplicationStatus, Appointment,
    AppointmentStats, AppointmentStatus, AppointmentType, CreatePetRequest, Gender, OwnerContact,
    Pet, Species, UpdateAppointmentRequest, UpdatePetRequest, User, UserCredentials, UserRole,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user. Fails with Conflict when the email or username
    /// is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        role: UserRole,
    ) -> Result<User, AppError> {
        let email = email.to_lowercase();

        let existing =
            sqlx::query("SELECT email, username FROM users WHERE email = ? OR username = ?")
                .bind(&email)
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(row) = existing {
            let taken_email: String = row.get("email");
            let msg = if taken_email == email {
                "Email already registered"
            } else {
                "Username already taken"
            };
            return Err(AppError::Conflict(msg.to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, full_name, role, is_active, last_login, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, NULL, ?, ?)"
        )
        .bind(&id)
        .bind(username)
        .bind(&email)
        .bind(password_hash)
        .bind(full_name)
        .bind(role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
            email,
            full_name: full_name.map(|s| s.to_string()),
            role,
            is_active: true,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, email, full_name, role, is_active, last_login, created_at, updated_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user with password hash by email, for login.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, full_name, role, is_active, last_login, created_at, updated_at FROM users WHERE email = ?"
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserCredentials {
            user: user_from_row(&row),
            password_hash: row.get("password_hash"),
        }))
    }

    /// List all users, newest first.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            "SELECT id, username, email, full_name, role, is_active, last_login, created_at, updated_at FROM users ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Admin update of role, active flag or full name.
    pub async fn update_user(
        &self,
        id: &str,
        role: Option<UserRole>,
        is_active: Option<bool>,
        full_name: Option<&str>,
    ) -> Result<User, AppError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let role = role.unwrap_or(existing.role);
        let is_active = is_active.unwrap_or(existing.is_active);
        let full_name = full_name
            .map(|s| s.to_string())
            .or(existing.full_name.clone());
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "UPDATE users SET role = ?, is_active = ?, full_name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(role.as_str())
        .bind(is_active as i32)
        .bind(&full_name)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(User {
            role,
            is_active,
            full_name,
            updated_at: now,
            ..existing
        })
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    /// Record a successful login.
    pub async fn update_last_login(&self, id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE users SET last_login = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== PET OPERATIONS ====================

    /// List all pets, newest first.
    pub async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pets ORDER BY created_at DESC",
            PET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(pet_from_row).collect())
    }

    /// List pets currently available for adoption, newest first.
    pub async fn list_available_pets(&self) -> Result<Vec<Pet>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pets WHERE available_for_adoption = 1 AND (adoption_status IS NULL OR adoption_status = 'available') ORDER BY created_at DESC",
            PET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(pet_from_row).collect())
    }

    /// Get a pet by ID.
    pub async fn get_pet(&self, id: &str) -> Result<Option<Pet>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM pets WHERE id = ?", PET_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(pet_from_row))
    }

    /// Create a new pet. Name and species presence are checked at the API
    /// boundary; enum values are validated here.
    pub async fn create_pet(&self, request: &CreatePetRequest) -> Result<Pet, AppError> {
        let name = request.name.clone().unwrap_or_default();
        let species = parse_species(request.species.as_deref().unwrap_or_default())?;
        let gender = request.gender.as_deref().map(parse_gender).transpose()?;
        let adoption_status = request
            .adoption_status
            .as_deref()
            .map(parse_adoption_state)
            .transpose()?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let owner = request.owner.clone().filter(|o| !o.is_empty());
        let medical_history = request.medical_history.clone().unwrap_or_default();
        let vaccinations = request.vaccinations.clone().unwrap_or_default();
        let medications = request.medications.clone().unwrap_or_default();
        let appointments = request.appointments.clone().unwrap_or_default();
        let available = request.available_for_adoption.unwrap_or(true);

        sqlx::query(
            r#"INSERT INTO pets (
                id, name, species, breed, age, weight, color, gender, image_url, notes,
                owner_name, owner_email, owner_phone, owner_address,
                medical_history, vaccinations, medications, appointments,
                available_for_adoption, adoption_status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&name)
        .bind(species.as_str())
        .bind(&request.breed)
        .bind(request.age)
        .bind(request.weight)
        .bind(&request.color)
        .bind(gender.map(|g| g.as_str()))
        .bind(&request.image_url)
        .bind(&request.notes)
        .bind(owner.as_ref().and_then(|o| o.name.clone()))
        .bind(owner.as_ref().and_then(|o| o.email.clone()))
        .bind(owner.as_ref().and_then(|o| o.phone.clone()))
        .bind(owner.as_ref().and_then(|o| o.address.clone()))
        .bind(to_json(&medical_history))
        .bind(to_json(&vaccinations))
        .bind(to_json(&medications))
        .bind(to_json(&appointments))
        .bind(available as i32)
        .bind(adoption_status.map(|s| s.as_str()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Pet {
            id,
            name,
            species,
            breed: request.breed.clone(),
            age: request.age,
            weight: request.weight,
            color: request.color.clone(),
            gender,
            image_url: request.image_url.clone(),
            notes: request.notes.clone(),
            owner,
            medical_history,
            vaccinations,
            medications,
            appointments,
            available_for_adoption: available,
            adoption_status,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a pet. Only provided fields are changed.
    pub async fn update_pet(&self, id: &str, request: &UpdatePetRequest) -> Result<Pet, AppError> {
        let existing = self
            .get_pet(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", id)))?;

        let name = request.name.clone().unwrap_or(existing.name);
        let species = match request.species.as_deref() {
            Some(s) => parse_species(s)?,
            None => existing.species,
        };
        let gender = match request.gender.as_deref() {
            Some(g) => Some(parse_gender(g)?),
            None => existing.gender,
        };
        let adoption_status = match request.adoption_status.as_deref() {
            Some(s) => Some(parse_adoption_state(s)?),
            None => existing.adoption_status,
        };
        let breed = request.breed.clone().or(existing.breed);
        let age = request.age.or(existing.age);
        let weight = request.weight.or(existing.weight);
        let color = request.color.clone().or(existing.color);
        let image_url = request.image_url.clone().or(existing.image_url);
        let notes = request.notes.clone().or(existing.notes);
        let owner = request
            .owner
            .clone()
            .filter(|o| !o.is_empty())
            .or(existing.owner);
        let medical_history = request
            .medical_history
            .clone()
            .unwrap_or(existing.medical_history);
        let vaccinations = request.vaccinations.clone().unwrap_or(existing.vaccinations);
        let medications = request.medications.clone().unwrap_or(existing.medications);
        let appointments = request.appointments.clone().unwrap_or(existing.appointments);
        let available = request
            .available_for_adoption
            .unwrap_or(existing.available_for_adoption);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"UPDATE pets SET
                name = ?, species = ?, breed = ?, age = ?, weight = ?, color = ?, gender = ?,
                image_url = ?, notes = ?, owner_name = ?, owner_email = ?, owner_phone = ?,
                owner_address = ?, medical_history = ?, vaccinations = ?, medications = ?,
                appointments = ?, available_for_adoption = ?, adoption_status = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&name)
        .bind(species.as_str())
        .bind(&breed)
        .bind(age)
        .bind(weight)
        .bind(&color)
        .bind(gender.map(|g| g.as_str()))
        .bind(&image_url)
        .bind(&notes)
        .bind(owner.as_ref().and_then(|o| o.name.clone()))
        .bind(owner.as_ref().and_then(|o| o.email.clone()))
        .bind(owner.as_ref().and_then(|o| o.phone.clone()))
        .bind(owner.as_ref().and_then(|o| o.address.clone()))
        .bind(to_json(&medical_history))
        .bind(to_json(&vaccinations))
        .bind(to_json(&medications))
        .bind(to_json(&appointments))
        .bind(available as i32)
        .bind(adoption_status.map(|s| s.as_str()))
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Pet {
            id: id.to_string(),
            name,
            species,
            breed,
            age,
            weight,
            color,
            gender,
            image_url,
            notes,
            owner,
            medical_history,
            vaccinations,
            medications,
            appointments,
            available_for_adoption: available,
            adoption_status,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a pet.
    pub async fn delete_pet(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Pet {} not found", id)));
        }
        Ok(())
    }

    // ==================== ADOPTION OPERATIONS ====================

    /// Persist a new application with a generated application id. The pet
    /// snapshot (name, species) is taken from the passed record.
    pub async fn create_application(
        &self,
        pet: &Pet,
        details: &ApplicantDetails,
    ) -> Result<AdoptionApplication, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let application_id = generate_application_id();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO adoption_applications (
                id, application_id, status, pet_id, pet_name, pet_species,
                full_name, email, phone, address, housing_type, own_or_rent,
                household_members, pet_experience, hours_alone, agreement,
                submitted_at, review_notes, reviewed_by, reviewed_at
            ) VALUES (?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL)"#,
        )
        .bind(&id)
        .bind(&application_id)
        .bind(&pet.id)
        .bind(&pet.name)
        .bind(pet.species.as_str())
        .bind(&details.full_name)
        .bind(&details.email)
        .bind(&details.phone)
        .bind(&details.address)
        .bind(details.housing_type.as_str())
        .bind(details.own_or_rent.as_str())
        .bind(&details.household_members)
        .bind(&details.pet_experience)
        .bind(details.hours_alone.as_str())
        .bind(details.agreement as i32)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(AdoptionApplication {
            id,
            application_id,
            status: ApplicationStatus::Pending,
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            pet_species: pet.species.as_str().to_string(),
            full_name: details.full_name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            housing_type: details.housing_type,
            own_or_rent: details.own_or_rent,
            household_members: details.household_members.clone(),
            pet_experience: details.pet_experience.clone(),
            hours_alone: details.hours_alone,
            agreement: details.agreement,
            submitted_at: now,
            review_notes: None,
            reviewed_by: None,
            reviewed_at: None,
        })
    }

    /// List applications, optionally filtered, newest submissions first.
    pub async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
        pet_id: Option<&str>,
    ) -> Result<Vec<AdoptionApplication>, AppError> {
        let mut sql = format!("SELECT {} FROM adoption_applications", APPLICATION_COLUMNS);
        let mut clauses: Vec<&str> = Vec::new();
        if status.is_some() {
            clauses.push("status = ?");
        }
        if pet_id.is_some() {
            clauses.push("pet_id = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY submitted_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        if let Some(pet_id) = pet_id {
            query = query.bind(pet_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(application_from_row).collect())
    }

    /// Get an application by ID.
    pub async fn get_application(&self, id: &str) -> Result<Option<AdoptionApplication>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM adoption_applications WHERE id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(application_from_row))
    }

    /// Transition an application's status.
    ///
    /// Approval cascades onto the referenced pet inside the same
    /// transaction, guarded by a compare-and-swap on
    /// `available_for_adoption`: the second of two approvals for one pet
    /// fails with Conflict and leaves the application untouched.
    pub async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        review_notes: Option<&str>,
        reviewed_by: &str,
    ) -> Result<AdoptionApplication, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM adoption_applications WHERE id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let existing = row
            .as_ref()
            .map(application_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))?;

        let now = Utc::now().to_rfc3339();

        if status == ApplicationStatus::Approved {
            let result = sqlx::query(
                "UPDATE pets SET available_for_adoption = 0, adoption_status = 'adopted', updated_at = ? WHERE id = ? AND available_for_adoption = 1"
            )
            .bind(&now)
            .bind(&existing.pet_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Pet {} is no longer available for adoption",
                    existing.pet_name
                )));
            }
        }

        let review_notes = review_notes
            .map(|s| s.to_string())
            .or(existing.review_notes.clone());

        sqlx::query(
            "UPDATE adoption_applications SET status = ?, review_notes = ?, reviewed_by = ?, reviewed_at = ? WHERE id = ?"
        )
        .bind(status.as_str())
        .bind(&review_notes)
        .bind(reviewed_by)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(AdoptionApplication {
            status,
            review_notes,
            reviewed_by: Some(reviewed_by.to_string()),
            reviewed_at: Some(now),
            ..existing
        })
    }

    /// Delete an application. No cascade to pet state.
    pub async fn delete_application(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM adoption_applications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application {} not found", id)));
        }
        Ok(())
    }

    /// Application counts keyed by lowercased pet species.
    pub async fn adoption_stats(&self) -> Result<BTreeMap<String, i64>, AppError> {
        let rows = sqlx::query(
            "SELECT p.species AS species, COUNT(*) AS count FROM adoption_applications a JOIN pets p ON p.id = a.pet_id GROUP BY p.species"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = BTreeMap::new();
        for row in rows {
            let species: String = row.get("species");
            let count: i64 = row.get("count");
            stats.insert(species.to_lowercase(), count);
        }
        Ok(stats)
    }

    // ==================== APPOINTMENT OPERATIONS ====================

    /// Create an appointment, denormalizing pet and user display fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_appointment(
        &self,
        pet: &Pet,
        user: &User,
        appointment_type: AppointmentType,
        date: &str,
        time: &str,
        veterinarian: &str,
        notes: Option<&str>,
    ) -> Result<Appointment, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO appointments (
                id, pet_id, pet_name, pet_species, user_id, user_email, user_name,
                type, date, time, veterinarian, status, notes, admin_notes,
                reviewed_by, reviewed_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'Pending', ?, NULL, NULL, NULL, ?, ?)"#,
        )
        .bind(&id)
        .bind(&pet.id)
        .bind(&pet.name)
        .bind(pet.species.as_str())
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(appointment_type.as_str())
        .bind(date)
        .bind(time)
        .bind(veterinarian)
        .bind(notes)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Appointment {
            id,
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            pet_species: pet.species.as_str().to_string(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            user_name: user.username.clone(),
            appointment_type,
            date: date.to_string(),
            time: time.to_string(),
            veterinarian: veterinarian.to_string(),
            status: AppointmentStatus::Pending,
            notes: notes.map(|s| s.to_string()),
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List all appointments ordered by date and time (admin view).
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM appointments ORDER BY date, time",
            APPOINTMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(appointment_from_row).collect())
    }

    /// List one user's appointments ordered by date and time.
    pub async fn list_appointments_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM appointments WHERE user_id = ? ORDER BY date, time",
            APPOINTMENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(appointment_from_row).collect())
    }

    /// Get an appointment by ID.
    pub async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM appointments WHERE id = ?",
            APPOINTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(appointment_from_row))
    }

    /// Transition an appointment's status and record the review.
    pub async fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        admin_notes: Option<&str>,
        reviewed_by: &str,
    ) -> Result<Appointment, AppError> {
        let existing = self
            .get_appointment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let admin_notes = admin_notes
            .map(|s| s.to_string())
            .or(existing.admin_notes.clone());

        sqlx::query(
            "UPDATE appointments SET status = ?, admin_notes = ?, reviewed_by = ?, reviewed_at = ?, updated_at = ? WHERE id = ?"
        )
        .bind(status.as_str())
        .bind(&admin_notes)
        .bind(reviewed_by)
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Appointment {
            status,
            admin_notes,
            reviewed_by: Some(reviewed_by.to_string()),
            reviewed_at: Some(now.clone()),
            updated_at: now,
            ..existing
        })
    }

    /// Update appointment details. Only provided fields are changed.
    pub async fn update_appointment(
        &self,
        id: &str,
        request: &UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let existing = self
            .get_appointment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        let appointment_type = match request.appointment_type.as_deref() {
            Some(t) => AppointmentType::from_str(t)
                .ok_or_else(|| AppError::Validation("Invalid appointment type".to_string()))?,
            None => existing.appointment_type,
        };
        let date = request.date.clone().unwrap_or(existing.date);
        let time = request.time.clone().unwrap_or(existing.time);
        let veterinarian = request.veterinarian.clone().unwrap_or(existing.veterinarian);
        let notes = request.notes.clone().or(existing.notes);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "UPDATE appointments SET type = ?, date = ?, time = ?, veterinarian = ?, notes = ?, updated_at = ? WHERE id = ?"
        )
        .bind(appointment_type.as_str())
        .bind(&date)
        .bind(&time)
        .bind(&veterinarian)
        .bind(&notes)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Appointment {
            appointment_type,
            date,
            time,
            veterinarian,
            notes,
            updated_at: now,
            ..existing
        })
    }

    /// Delete an appointment.
    pub async fn delete_appointment(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        Ok(())
    }

    /// Appointment counts per status.
    pub async fn appointment_stats(&self) -> Result<AppointmentStats, AppError> {
        let rows = sqlx::query("SELECT status, COUNT(*) AS count FROM appointments GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        let mut stats = AppointmentStats::default();
        for row in rows {
            let status: String = row.get("status");
            let count: i64 = row.get("count");
            stats.total += count;
            match status.as_str() {
                "Pending" => stats.pending = count,
                "Confirmed" => stats.confirmed = count,
                "Completed" => stats.completed = count,
                "Cancelled" => stats.cancelled = count,
                "Rejected" => stats.rejected = count,
                _ => {}
            }
        }
        Ok(stats)
    }
}

// Column lists shared by the per-entity SELECTs.

const PET_COLUMNS: &str = "id, name, species, breed, age, weight, color, gender, image_url, notes, \
    owner_name, owner_email, owner_phone, owner_address, medical_history, vaccinations, \
    medications, appointments, available_for_adoption, adoption_status, created_at, updated_at";

const APPLICATION_COLUMNS: &str = "id, application_id, status, pet_id, pet_name, pet_species, \
    full_name, email, phone, address, housing_type, own_or_rent, household_members, \
    pet_experience, hours_alone, agreement, submitted_at, review_notes, reviewed_by, reviewed_at";

const APPOINTMENT_COLUMNS: &str = "id, pet_id, pet_name, pet_species, user_id, user_email, \
    user_name, type, date, time, veterinarian, status, notes, admin_notes, reviewed_by, \
    reviewed_at, created_at, updated_at";

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let is_active: i32 = row.get("is_active");
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        role: UserRole::from_str(&role).unwrap_or(UserRole::User),
        is_active: is_active != 0,
        last_login: row.get("last_login"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn pet_from_row(row: &sqlx::sqlite::SqliteRow) -> Pet {
    let species: String = row.get("species");
    let gender: Option<String> = row.get("gender");
    let adoption_status: Option<String> = row.get("adoption_status");
    let available: i32 = row.get("available_for_adoption");
    let owner = OwnerContact {
        name: row.get("owner_name"),
        email: row.get("owner_email"),
        phone: row.get("owner_phone"),
        address: row.get("owner_address"),
    };

    Pet {
        id: row.get("id"),
        name: row.get("name"),
        species: Species::from_str(&species).unwrap_or(Species::Other),
        breed: row.get("breed"),
        age: row.get("age"),
        weight: row.get("weight"),
        color: row.get("color"),
        gender: gender.as_deref().and_then(Gender::from_str),
        image_url: row.get("image_url"),
        notes: row.get("notes"),
        owner: (!owner.is_empty()).then_some(owner),
        medical_history: parse_json_list(row.get("medical_history")),
        vaccinations: parse_json_list(row.get("vaccinations")),
        medications: parse_json_list(row.get("medications")),
        appointments: parse_json_list(row.get("appointments")),
        available_for_adoption: available != 0,
        adoption_status: adoption_status.as_deref().and_then(AdoptionState::from_str),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn application_from_row(row: &sqlx::sqlite::SqliteRow) -> AdoptionApplication {
    let status: String = row.get("status");
    let housing_type: String = row.get("housing_type");
    let own_or_rent: String = row.get("own_or_rent");
    let hours_alone: String = row.get("hours_alone");
    let agreement: i32 = row.get("agreement");

    AdoptionApplication {
        id: row.get("id"),
        application_id: row.get("application_id"),
        status: ApplicationStatus::from_str(&status).unwrap_or(ApplicationStatus::Pending),
        pet_id: row.get("pet_id"),
        pet_name: row.get("pet_name"),
        pet_species: row.get("pet_species"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        address: row.get("address"),
        housing_type: crate::models::HousingType::from_str(&housing_type)
            .unwrap_or(crate::models::HousingType::Other),
        own_or_rent: crate::models::OwnOrRent::from_str(&own_or_rent)
            .unwrap_or(crate::models::OwnOrRent::Rent),
        household_members: row.get("household_members"),
        pet_experience: row.get("pet_experience"),
        hours_alone: crate::models::HoursAlone::from_str(&hours_alone)
            .unwrap_or(crate::models::HoursAlone::ZeroToFour),
        agreement: agreement != 0,
        submitted_at: row.get("submitted_at"),
        review_notes: row.get("review_notes"),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
    }
}

fn appointment_from_row(row: &sqlx::sqlite::SqliteRow) -> Appointment {
    let appointment_type: String = row.get("type");
    let status: String = row.get("status");

    Appointment {
        id: row.get("id"),
        pet_id: row.get("pet_id"),
        pet_name: row.get("pet_name"),
        pet_species: row.get("pet_species"),
        user_id: row.get("user_id"),
        user_email: row.get("user_email"),
        user_name: row.get("user_name"),
        appointment_type: AppointmentType::from_str(&appointment_type)
            .unwrap_or(AppointmentType::Other),
        date: row.get("date"),
        time: row.get("time"),
        veterinarian: row.get("veterinarian"),
        status: AppointmentStatus::from_str(&status).unwrap_or(AppointmentStatus::Pending),
        notes: row.get("notes"),
        admin_notes: row.get("admin_notes"),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(s: Option<String>) -> Vec<T> {
    s.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

fn parse_species(s: &str) -> Result<Species, AppError> {
    Species::from_str(s)
        .ok_or_else(|| AppError::Validation(format!("Invalid species: {:?}", s)))
}

fn parse_gender(s: &str) -> Result<Gender, AppError> {
    Gender::from_str(s).ok_or_else(|| AppError::Validation(format!("Invalid gender: {:?}", s)))
}

fn parse_adoption_state(s: &str) -> Result<AdoptionState, AppError> {
    AdoptionState::from_str(s)
        .ok_or_else(|| AppError::Validation(format!("Invalid adoption status: {:?}", s)))
}

/// Generate a human-readable application id: APP-<base36 millis>-<5 random chars>.
fn generate_application_id() -> String {
    const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let timestamp = to_base36(Utc::now().timestamp_millis() as u64);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("APP-{}-{}", timestamp, suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
