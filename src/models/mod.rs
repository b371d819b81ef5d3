//! Data models for the Pet Care application.
//!
//! These models match the frontend JSON contract: camelCase field names,
//! status enums carried as their wire strings.

mod adoption;
mod appointment;
mod pet;
mod user;

pub use adoption::*;
pub use appointment::*;
pub use pet::*;
pub use user::*;
