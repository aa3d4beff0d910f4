use super::Repository;
use crate::FitlogError;
use crate::models::MuscleGrowthSimulation;
use crate::store::{DocumentStore, WriteMode};
use std::sync::Arc;

/// Stored muscle-growth simulation results.
#[derive(Clone)]
pub struct MuscleSimulationService {
    repo: Repository<MuscleGrowthSimulation>,
}

impl MuscleSimulationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(
        &self,
        simulation_id: &str,
    ) -> Result<Option<MuscleGrowthSimulation>, FitlogError> {
        self.repo.get("get_muscle_simulation", simulation_id).await
    }

    pub async fn save(
        &self,
        simulation: MuscleGrowthSimulation,
    ) -> Result<MuscleGrowthSimulation, FitlogError> {
        self.repo
            .save("save_muscle_simulation", simulation, WriteMode::Overwrite)
            .await
    }

    /// The newest simulation of `user_id`, if any.
    pub async fn get_latest(
        &self,
        user_id: &str,
    ) -> Result<Option<MuscleGrowthSimulation>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .order_by_desc("date")
            .limit(1);
        let latest = self.repo.find("get_latest_muscle_simulation", query).await?;
        Ok(latest.into_iter().next())
    }

    /// All simulations of `user_id`, most recent first.
    pub async fn get_all_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<MuscleGrowthSimulation>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .order_by_desc("date");
        self.repo.find("get_user_muscle_simulations", query).await
    }
}
