use super::Repository;
use crate::FitlogError;
use crate::models::WorkoutSession;
use crate::store::{DocumentStore, WriteMode};
use crate::timestamp::Timestamp;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct WorkoutSessionService {
    repo: Repository<WorkoutSession>,
}

impl WorkoutSessionService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<WorkoutSession>, FitlogError> {
        self.repo.get("get_workout_session", session_id).await
    }

    /// Full overwrite of the session document.
    pub async fn save(&self, session: WorkoutSession) -> Result<WorkoutSession, FitlogError> {
        self.repo
            .save("save_workout_session", session, WriteMode::Overwrite)
            .await
    }

    /// All sessions of `user_id`, most recent first.
    pub async fn get_all_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkoutSession>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .order_by_desc("date");
        self.repo.find("get_user_workout_sessions", query).await
    }

    /// Sessions of `user_id` dated within `[start, end]`, most recent first.
    pub async fn get_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .where_between("date", Timestamp::from_date(start), Timestamp::from_date(end))
            .order_by_desc("date");
        self.repo
            .find("get_workout_sessions_by_date_range", query)
            .await
    }
}
