use super::Repository;
use crate::FitlogError;
use crate::codec::Entity;
use crate::models::{UserProfile, UserProfileUpdate};
use crate::store::{DocumentStore, Fields, Value, WriteMode};
use crate::timestamp::Timestamp;
use std::sync::Arc;

/// User profiles, keyed by user id, in the `users` collection.
#[derive(Clone)]
pub struct ProfileService {
    repo: Repository<UserProfile>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, FitlogError> {
        self.repo.get("get_user_profile", user_id).await
    }

    /// Merge-write the profile: stored fields missing from `profile` (an unset
    /// body-fat percentage, for example) are kept. `updated_at` is set to now;
    /// `created_at` is written as supplied.
    pub async fn save(&self, mut profile: UserProfile) -> Result<UserProfile, FitlogError> {
        profile.updated_at = Timestamp::now().to_date();
        self.repo
            .save("save_user_profile", profile, WriteMode::Merge)
            .await
    }

    /// Merge only the `Some` fields of `update` (plus `updatedAt`) into the
    /// stored profile.
    pub async fn update(
        &self,
        user_id: &str,
        update: &UserProfileUpdate,
    ) -> Result<(), FitlogError> {
        let mut fields = match Value::from_json(serde_json::to_value(update)?) {
            Value::Map(fields) => fields,
            _ => Fields::new(),
        };
        fields.insert("updatedAt".into(), Value::Timestamp(Timestamp::now()));
        tracing::debug!(
            collection = UserProfile::COLLECTION,
            fields = fields.len(),
            "updating user profile"
        );
        self.repo
            .write_fields("update_user_profile", user_id, fields, WriteMode::Merge)
            .await
    }
}
