use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClarifyError;

/// Top-level configuration loaded from `.clarify.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use clarify_core::ClarifyConfig;
///
/// let config = ClarifyConfig::default();
/// assert_eq!(config.llm.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClarifyConfig {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Batch run settings.
    #[serde(default)]
    pub run: RunConfig,
}

impl ClarifyConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Io`] if the file cannot be read, or
    /// [`ClarifyError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clarify_core::ClarifyConfig;
    /// use std::path::Path;
    ///
    /// let config = ClarifyConfig::from_file(Path::new(".clarify.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ClarifyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use clarify_core::ClarifyConfig;
    ///
    /// let toml = r#"
    /// [run]
    /// limit = 25
    /// "#;
    /// let config = ClarifyConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.run.limit, Some(25));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ClarifyError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use clarify_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.provider, "openai");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"ollama"`, `"gemini"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Batch run configuration.
///
/// # Examples
///
/// ```
/// use clarify_core::RunConfig;
///
/// let config = RunConfig::default();
/// assert_eq!(config.limit, None);
/// assert!(config.progress);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Process only the first N input records when set.
    pub limit: Option<usize>,
    /// Show a progress bar while generating reviews (default: true).
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_progress() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            limit: None,
            progress: default_progress(),
        }
    }
}
