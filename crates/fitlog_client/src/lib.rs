//! Persistence and synchronization layer for the fitlog fitness tracker.
//!
//! Entity services ([`services`]) read and write the app's records in a remote
//! Firestore database through the [`DocumentStore`](store::DocumentStore) trait,
//! and [`imagegen`] asks a generative model for a muscle-growth rendering.

use thiserror::Error;

pub mod codec;
pub mod config;
pub mod imagegen;
pub mod models;
pub mod observability;
pub mod services;
pub mod store;
pub mod timestamp;

#[cfg(test)]
mod test_utils;

pub use models::{
    BodyMeasurement, BodyPartMeasurements, Exercise, FitnessLevel, Gender, Goal, GoalCategory,
    MuscleGroup, MuscleGrowthSimulation, UserProfile, UserProfileUpdate, WorkoutExercise,
    WorkoutSession, WorkoutSet,
};
pub use services::FitnessServices;
pub use timestamp::Timestamp;

#[derive(Debug, Error)]
pub enum FitlogError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("store error (status {status}): {message}")]
    Store { status: u16, message: String },
    #[error("image generation error: {0}")]
    Generation(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FitlogError {
    fn from(err: serde_json::Error) -> Self {
        FitlogError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FitlogError>;
