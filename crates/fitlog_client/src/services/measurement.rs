use super::Repository;
use crate::FitlogError;
use crate::models::BodyMeasurement;
use crate::store::{DocumentStore, WriteMode};
use crate::timestamp::Timestamp;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct BodyMeasurementService {
    repo: Repository<BodyMeasurement>,
}

impl BodyMeasurementService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(&self, measurement_id: &str) -> Result<Option<BodyMeasurement>, FitlogError> {
        self.repo.get("get_body_measurement", measurement_id).await
    }

    pub async fn save(&self, measurement: BodyMeasurement) -> Result<BodyMeasurement, FitlogError> {
        self.repo
            .save("save_body_measurement", measurement, WriteMode::Overwrite)
            .await
    }

    /// Measurement history of `user_id`, most recent first.
    pub async fn get_all_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<BodyMeasurement>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .order_by_desc("date");
        self.repo.find("get_user_body_measurements", query).await
    }

    /// Measurements of `user_id` dated within `[start, end]`, most recent first.
    pub async fn get_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BodyMeasurement>, FitlogError> {
        let query = self
            .repo
            .query()
            .where_eq("userId", user_id)
            .where_between("date", Timestamp::from_date(start), Timestamp::from_date(end))
            .order_by_desc("date");
        self.repo
            .find("get_body_measurements_by_date_range", query)
            .await
    }
}
