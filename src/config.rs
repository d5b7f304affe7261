use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default folder holding text produced by generative models.
pub const DEFAULT_GENERATED_DIR: &str = "./source_documents/llm_text_extraction/results/";
/// Default folder holding author insight notes.
pub const DEFAULT_AUTHOR_DIR: &str = "./source_documents/author_insights/";
/// Author recorded when the model cannot name one.
pub const DEFAULT_AUTHOR_PLACEHOLDER: &str = "gemini";

/// Errors encountered while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required setting was provided neither by the environment nor the settings file.
    #[error("Missing setting: {0}")]
    MissingVariable(String),
    /// Setting contained a value that could not be parsed.
    #[error("Invalid value for setting: {0}")]
    InvalidValue(String),
    /// Settings file exists but could not be read.
    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Settings file is not valid JSON for the expected layout.
    #[error("Failed to parse settings file {}: {source}", path.display())]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration for a Second Brain run.
///
/// Built once at startup and handed to every component by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Azure AI Search service.
    pub search_endpoint: String,
    /// Name of the index that is recreated on each run.
    pub search_index: String,
    /// Admin key for the search service.
    pub search_key: String,
    /// Base URL of the Azure OpenAI resource.
    pub openai_endpoint: String,
    /// Key for the Azure OpenAI resource.
    pub openai_key: String,
    /// Base URL of the Text Analytics resource.
    pub text_analytics_endpoint: String,
    /// Key for the Text Analytics resource.
    pub text_analytics_key: String,
    /// Folders scanned for `<topic>.txt` files, in reading order.
    pub source_dirs: Vec<PathBuf>,
    /// Author stored when extraction yields nothing.
    pub author_placeholder: String,
    /// Optional cap on search hits folded into the synthesis prompt.
    pub synthesis_max_sources: Option<usize>,
}

/// On-disk settings layout (`appsettings.json`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    /// Search service section.
    #[serde(rename = "AzureSearchIndexApi")]
    pub search: SearchSettings,
    /// Language model section.
    #[serde(rename = "LLM")]
    pub llm: LlmSettings,
    /// Text analytics section.
    #[serde(rename = "TextAnalytics")]
    pub text_analytics: EndpointSettings,
}

/// Search service connection settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Service URL.
    pub endpoint: Option<String>,
    /// Index name.
    pub index: Option<String>,
    /// Admin key.
    pub key: Option<String>,
}

/// Language model settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Azure OpenAI resource.
    #[serde(rename = "AzureOpenAI")]
    pub azure_openai: EndpointSettings,
}

/// Endpoint plus key pair shared by the OpenAI and Text Analytics sections.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Resource URL.
    pub endpoint: Option<String>,
    /// Resource key.
    pub key: Option<String>,
}

impl SettingsFile {
    /// Read a settings file, returning an empty layout when the file does not exist.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Settings file not found; using environment only");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Load configuration from `.env`, the environment, and the given settings file.
    ///
    /// Environment variables take precedence over the settings file.
    pub fn load(settings_path: &Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let settings = SettingsFile::read(settings_path)?;
        let config = Self::from_sources(settings)?;
        tracing::debug!(
            search_endpoint = %config.search_endpoint,
            index = %config.search_index,
            openai_endpoint = %config.openai_endpoint,
            text_analytics_endpoint = %config.text_analytics_endpoint,
            source_dirs = ?config.source_dirs,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Merge a parsed settings file with environment overrides and validate the result.
    pub fn from_sources(settings: SettingsFile) -> Result<Self, ConfigError> {
        let SettingsFile {
            search,
            llm,
            text_analytics,
        } = settings;

        let generated_dir =
            load_env_optional("SOURCE_GENERATED_DIR").unwrap_or_else(|| DEFAULT_GENERATED_DIR.into());
        let author_dir =
            load_env_optional("SOURCE_AUTHOR_DIR").unwrap_or_else(|| DEFAULT_AUTHOR_DIR.into());

        Ok(Self {
            search_endpoint: validate_url(
                "AZURE_SEARCH_ENDPOINT",
                resolve("AZURE_SEARCH_ENDPOINT", search.endpoint)?,
            )?,
            search_index: resolve("AZURE_SEARCH_INDEX", search.index)?,
            search_key: resolve("AZURE_SEARCH_KEY", search.key)?,
            openai_endpoint: validate_url(
                "AZURE_OPENAI_ENDPOINT",
                resolve("AZURE_OPENAI_ENDPOINT", llm.azure_openai.endpoint)?,
            )?,
            openai_key: resolve("AZURE_OPENAI_KEY", llm.azure_openai.key)?,
            text_analytics_endpoint: validate_url(
                "TEXT_ANALYTICS_ENDPOINT",
                resolve("TEXT_ANALYTICS_ENDPOINT", text_analytics.endpoint)?,
            )?,
            text_analytics_key: resolve("TEXT_ANALYTICS_KEY", text_analytics.key)?,
            source_dirs: vec![PathBuf::from(generated_dir), PathBuf::from(author_dir)],
            author_placeholder: load_env_optional("AUTHOR_PLACEHOLDER")
                .unwrap_or_else(|| DEFAULT_AUTHOR_PLACEHOLDER.into()),
            synthesis_max_sources: load_env_optional("SYNTHESIS_MAX_SOURCES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SYNTHESIS_MAX_SOURCES".into()))
                })
                .transpose()?,
        })
    }
}

/// Prefer the environment, then the settings file value, rejecting blanks.
fn resolve(key: &str, file_value: Option<String>) -> Result<String, ConfigError> {
    load_env_optional(key)
        .or_else(|| file_value.filter(|value| !value.trim().is_empty()))
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    reqwest::Url::parse(&value).map_err(|_| ConfigError::InvalidValue(key.to_string()))?;
    Ok(value)
}
