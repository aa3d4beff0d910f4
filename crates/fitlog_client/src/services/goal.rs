use super::Repository;
use crate::FitlogError;
use crate::models::Goal;
use crate::store::{DocumentStore, WriteMode};
use crate::timestamp::Timestamp;
use std::sync::Arc;

#[derive(Clone)]
pub struct GoalService {
    repo: Repository<Goal>,
}

impl GoalService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(&self, goal_id: &str) -> Result<Option<Goal>, FitlogError> {
        self.repo.get("get_goal", goal_id).await
    }

    /// Full overwrite with `updated_at` set to now. An unset `target_date` is
    /// stored as an explicit null.
    pub async fn save(&self, mut goal: Goal) -> Result<Goal, FitlogError> {
        goal.updated_at = Timestamp::now().to_date();
        self.repo.save("save_goal", goal, WriteMode::Overwrite).await
    }

    /// Goals of `user_id`, newest first by creation time.
    pub async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<Goal>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .order_by_desc("createdAt");
        self.repo.find("get_user_goals", query).await
    }

    /// Deleting a goal that does not exist succeeds.
    pub async fn delete(&self, goal_id: &str) -> Result<(), FitlogError> {
        self.repo.delete("delete_goal", goal_id).await
    }
}
