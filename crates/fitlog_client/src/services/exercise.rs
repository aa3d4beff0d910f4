use super::Repository;
use crate::FitlogError;
use crate::models::{Exercise, MuscleGroup};
use crate::store::{DocumentStore, WriteMode};
use std::sync::Arc;

/// The global exercise catalog.
#[derive(Clone)]
pub struct ExerciseService {
    repo: Repository<Exercise>,
}

impl ExerciseService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(&self, exercise_id: &str) -> Result<Option<Exercise>, FitlogError> {
        self.repo.get("get_exercise", exercise_id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Exercise>, FitlogError> {
        self.repo.find("get_all_exercises", self.repo.query()).await
    }

    pub async fn get_by_muscle_group(
        &self,
        muscle_group: MuscleGroup,
    ) -> Result<Vec<Exercise>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("muscleGroup", muscle_group.as_str());
        self.repo
            .find("get_exercises_by_muscle_group", query)
            .await
    }

    /// Add or replace a catalog entry.
    pub async fn save(&self, exercise: Exercise) -> Result<Exercise, FitlogError> {
        self.repo
            .save("save_exercise", exercise, WriteMode::Overwrite)
            .await
    }
}
