//! Entity services.
//!
//! Each service is a thin, cloneable handle over a shared [`DocumentStore`].
//! Store faults are logged with the operation and collection, then returned
//! unchanged; absence is `Ok(None)` or an empty `Vec`, never an error.
//!
//! Records that share the same ordering date come back in whatever order the
//! store returns them.

use crate::FitlogError;
use crate::codec::{self, Entity};
use crate::config::StoreConfig;
use crate::store::{self, DocumentStore, Query, WriteMode};
use std::marker::PhantomData;
use std::sync::Arc;

pub mod exercise;
pub mod goal;
pub mod measurement;
pub mod profile;
pub mod simulation;
pub mod workout;

pub use exercise::ExerciseService;
pub use goal::GoalService;
pub use measurement::BodyMeasurementService;
pub use profile::ProfileService;
pub use simulation::MuscleSimulationService;
pub use workout::WorkoutSessionService;

/// Entry point bundling all entity services over one store connection.
#[derive(Clone)]
pub struct FitnessServices {
    store: Arc<dyn DocumentStore>,
}

impl FitnessServices {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Services backed by the process-wide Firestore connection.
    pub fn connect(config: &StoreConfig) -> Result<Self, FitlogError> {
        let store: Arc<dyn DocumentStore> = store::shared(config)?;
        Ok(Self::new(store))
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    pub fn workouts(&self) -> WorkoutSessionService {
        WorkoutSessionService::new(self.store.clone())
    }

    pub fn exercises(&self) -> ExerciseService {
        ExerciseService::new(self.store.clone())
    }

    pub fn goals(&self) -> GoalService {
        GoalService::new(self.store.clone())
    }

    pub fn simulations(&self) -> MuscleSimulationService {
        MuscleSimulationService::new(self.store.clone())
    }

    pub fn measurements(&self) -> BodyMeasurementService {
        BodyMeasurementService::new(self.store.clone())
    }
}

/// Typed access to the collection holding `E`.
pub(crate) struct Repository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub(crate) fn query(&self) -> Query {
        Query::collection(E::COLLECTION)
    }

    pub(crate) async fn get(
        &self,
        operation: &'static str,
        id: &str,
    ) -> Result<Option<E>, FitlogError> {
        observe(operation, E::COLLECTION, self.fetch(id).await)
    }

    pub(crate) async fn find(
        &self,
        operation: &'static str,
        query: Query,
    ) -> Result<Vec<E>, FitlogError> {
        observe(operation, E::COLLECTION, self.fetch_all(&query).await)
    }

    /// Write `entity` under its id (a fresh UUID when empty) and return it
    /// with that id attached.
    pub(crate) async fn save(
        &self,
        operation: &'static str,
        mut entity: E,
        mode: WriteMode,
    ) -> Result<E, FitlogError> {
        if entity.id().is_empty() {
            entity.set_id(uuid::Uuid::new_v4().to_string());
        }
        let result = self.store_entity(&entity, mode).await;
        observe(operation, E::COLLECTION, result).map(|()| entity)
    }

    pub(crate) async fn write_fields(
        &self,
        operation: &'static str,
        id: &str,
        fields: store::Fields,
        mode: WriteMode,
    ) -> Result<(), FitlogError> {
        let result = self.store.set_document(E::COLLECTION, id, fields, mode).await;
        observe(operation, E::COLLECTION, result)
    }

    pub(crate) async fn delete(
        &self,
        operation: &'static str,
        id: &str,
    ) -> Result<(), FitlogError> {
        let result = self.store.delete_document(E::COLLECTION, id).await;
        observe(operation, E::COLLECTION, result)
    }

    async fn fetch(&self, id: &str) -> Result<Option<E>, FitlogError> {
        match self.store.get_document(E::COLLECTION, id).await? {
            Some(doc) => codec::decode(doc).map(Some),
            None => Ok(None),
        }
    }

    async fn fetch_all(&self, query: &Query) -> Result<Vec<E>, FitlogError> {
        self.store
            .run_query(query)
            .await?
            .into_iter()
            .map(codec::decode)
            .collect()
    }

    async fn store_entity(&self, entity: &E, mode: WriteMode) -> Result<(), FitlogError> {
        let fields = codec::encode(entity)?;
        self.store
            .set_document(E::COLLECTION, entity.id(), fields, mode)
            .await
    }
}

/// Log and count the outcome of a store operation, passing the result through.
fn observe<T>(
    operation: &'static str,
    collection: &'static str,
    result: Result<T, FitlogError>,
) -> Result<T, FitlogError> {
    let outcome = match &result {
        Ok(_) => {
            tracing::debug!(operation, collection, "store operation succeeded");
            "ok"
        }
        Err(error) => {
            tracing::error!(operation, collection, %error, "store operation failed");
            "error"
        }
    };
    metrics::counter!(
        "fitlog_store_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    result
}
