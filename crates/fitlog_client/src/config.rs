use crate::FitlogError;
use secrecy::SecretString;

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro-vision";

#[derive(Clone, Debug)]
pub struct Config {
    pub store: StoreConfig,
    /// `None` when no generative-model API key is configured.
    pub image: Option<ImageConfig>,
}

/// Connection parameters for the Firestore REST endpoint.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub api_key: SecretString,
    pub project_id: String,
    pub database: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FitlogError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration values through `get` instead of the process
    /// environment, so tests never have to mutate global state.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitlogError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api_key = get("FITLOG_FIREBASE_API_KEY")
            .ok_or_else(|| FitlogError::Config("FITLOG_FIREBASE_API_KEY missing".into()))?;
        let project_id = get("FITLOG_FIREBASE_PROJECT_ID")
            .ok_or_else(|| FitlogError::Config("FITLOG_FIREBASE_PROJECT_ID missing".into()))?;
        let database = get("FITLOG_FIRESTORE_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into());
        let base_url =
            get("FITLOG_FIRESTORE_BASE_URL").unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.into());

        let image = get("FITLOG_GEMINI_API_KEY").map(|key| ImageConfig {
            api_key: SecretString::new(key.into()),
            model: get("FITLOG_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            base_url: get("FITLOG_GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
        });

        Ok(Self {
            store: StoreConfig {
                api_key: SecretString::new(api_key.into()),
                project_id,
                database,
                base_url,
            },
            image,
        })
    }
}
