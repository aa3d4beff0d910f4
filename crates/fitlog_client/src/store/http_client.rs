//! Firestore REST implementation of [`DocumentStore`](super::DocumentStore).

use super::query::Query;
use super::value::Fields;
use super::{DocumentStore, StoredDocument, WriteMode};
use crate::FitlogError;
use crate::config::StoreConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Client for a Firestore database using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestDocumentStore {
    base_url: String,
    project_id: String,
    database: String,
    api_key: SecretString,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    fields: &'a Fields,
}

#[derive(Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Fields,
}

impl From<WireDocument> for StoredDocument {
    fn from(doc: WireDocument) -> Self {
        let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
        StoredDocument {
            id,
            fields: doc.fields,
        }
    }
}

#[derive(Deserialize)]
struct RunQueryEntry {
    document: Option<WireDocument>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryBody<'a> {
    structured_query: super::query::StructuredQuery<'a>,
}

impl ReqwestDocumentStore {
    /// Create a new client for the `(default)` database of `project_id`.
    ///
    /// # Arguments
    /// * `base_url` - Firestore REST root (e.g. "https://firestore.googleapis.com")
    /// * `project_id` - The Firebase project id
    /// * `api_key` - Web API key, sent as the `key` query parameter
    pub fn new(
        base_url: &str,
        project_id: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, FitlogError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FitlogError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database: crate::config::DEFAULT_DATABASE.to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, FitlogError> {
        Ok(Self::new(&config.base_url, config.project_id.clone(), config.api_key.clone())?
            .with_database(config.database.clone()))
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    /// Collection and id are pushed as escaped path segments, so ids holding
    /// `#`, `?`, `/` or `%` still name exactly one document.
    fn document_url(&self, collection: &str, id: &str) -> Result<reqwest::Url, FitlogError> {
        let mut url = reqwest::Url::parse(&self.documents_url())
            .map_err(|e| FitlogError::Config(format!("invalid store url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| FitlogError::Config("store url cannot take a path".into()))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    fn keyed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.query(&[("key", self.api_key.expose_secret())])
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FitlogError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message: String = body.chars().take(256).collect();
        FitlogError::Store { status, message }
    }
}

#[async_trait]
impl DocumentStore for ReqwestDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FitlogError> {
        let url = self.document_url(collection, id)?;
        let resp = self.keyed(self.client.get(url)).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read the body as text first so a shape mismatch can quote it.
        let text = resp.text().await?;
        let doc = serde_json::from_str::<WireDocument>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            FitlogError::Decode(format!("decoding document: {e} - body: {body_snippet}"))
        })?;
        Ok(Some(doc.into()))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), FitlogError> {
        let url = self.document_url(collection, id)?;
        let mut request = self.keyed(self.client.patch(url));
        if mode == WriteMode::Merge {
            let mask: Vec<(&str, &str)> = fields
                .keys()
                .map(|k| ("updateMask.fieldPaths", k.as_str()))
                .collect();
            request = request.query(&mask);
        }
        let resp = request.json(&WriteBody { fields: &fields }).send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FitlogError> {
        let url = self.document_url(collection, id)?;
        let resp = self.keyed(self.client.delete(url)).send().await?;
        if resp.status().is_success() || resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(self.error_from_response(resp).await)
    }

    async fn run_query(&self, query: &Query) -> Result<Vec<StoredDocument>, FitlogError> {
        let url = format!("{}:runQuery", self.documents_url());
        let body = RunQueryBody {
            structured_query: query.to_structured_query(),
        };
        let resp = self.keyed(self.client.post(&url)).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let text = resp.text().await?;
        let entries = serde_json::from_str::<Vec<RunQueryEntry>>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            FitlogError::Decode(format!("decoding query results: {e} - body: {body_snippet}"))
        })?;
        // entries without a document only carry readTime / skippedResults
        Ok(entries
            .into_iter()
            .filter_map(|entry| entry.document.map(StoredDocument::from))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_urls_include_project_and_database() {
        let store = ReqwestDocumentStore::new(
            "http://localhost/",
            "fitlog-dev",
            SecretString::new("key".into()),
        )
        .expect("store")
        .with_database("staging");
        assert_eq!(
            store.document_url("goals", "g1").unwrap().as_str(),
            "http://localhost/v1/projects/fitlog-dev/databases/staging/documents/goals/g1"
        );
    }

    #[test]
    fn document_ids_are_escaped_as_one_segment() {
        let store = ReqwestDocumentStore::new(
            "http://localhost",
            "fitlog-dev",
            SecretString::new("key".into()),
        )
        .expect("store");
        let url = store.document_url("goals", "run#5k?x/50% pace").unwrap();
        assert_eq!(
            url.path(),
            "/v1/projects/fitlog-dev/databases/(default)/documents/goals/run%235k%3Fx%2F50%25%20pace"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn document_id_comes_from_the_name_suffix() {
        let wire = WireDocument {
            name: "projects/p/databases/(default)/documents/users/u42".into(),
            fields: Fields::new(),
        };
        let doc = StoredDocument::from(wire);
        assert_eq!(doc.id, "u42");
        assert!(doc.fields.is_empty());
    }
}
