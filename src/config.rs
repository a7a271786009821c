//! Configuration for deck generation.
//!
//! Everything a run needs is carried by [`DeckConfig`], built through
//! [`DeckConfigBuilder`]. The heuristic engine itself only reads the slide
//! target; the rest configures the optional LLM pass and figure placement.

use crate::client::ChatCompletionClient;
use crate::error::DeckError;
use crate::output::DeckMode;
use crate::pipeline::figures::FigureDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Total slides (content + title + agenda) when nothing else is requested.
pub const DEFAULT_TARGET_SLIDES: u32 = 12;
pub const MIN_TARGET_SLIDES: u32 = 6;
pub const MAX_TARGET_SLIDES: u32 = 30;

/// Lenient slide-count parsing for request harnesses: an integer in
/// 6–30, anything else gives [`DEFAULT_TARGET_SLIDES`].
pub fn parse_target_slides(value: &str) -> u32 {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (MIN_TARGET_SLIDES..=MAX_TARGET_SLIDES).contains(n))
        .unwrap_or(DEFAULT_TARGET_SLIDES)
}

impl FromStr for DeckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(DeckMode::Static),
            "llm" => Ok(DeckMode::Llm),
            other => Err(format!("unknown mode '{other}' (expected static or llm)")),
        }
    }
}

// ── Providers ────────────────────────────────────────────────────────────

/// Chat-completion backends the deck generator can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Azure,
    Anthropic,
    DeepSeek,
    /// Any other OpenAI-compatible endpoint.
    Custom,
}

impl ProviderKind {
    /// Parse a provider name; unknown names become [`ProviderKind::OpenAi`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "azure" => Self::Azure,
            "anthropic" => Self::Anthropic,
            "deepseek" => Self::DeepSeek,
            "custom" => Self::Custom,
            _ => Self::OpenAi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Azure => "azure",
            Self::Anthropic => "anthropic",
            Self::DeepSeek => "deepseek",
            Self::Custom => "custom",
        }
    }

    /// Base URL used when none is configured. Azure and custom endpoints
    /// are deployment-specific and have none.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("https://api.openai.com/v1"),
            Self::Anthropic => Some("https://api.anthropic.com/v1"),
            Self::DeepSeek => Some("https://api.deepseek.com/v1"),
            Self::Azure | Self::Custom => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-sonnet-latest",
            Self::DeepSeek => "deepseek-chat",
            Self::OpenAi | Self::Azure | Self::Custom => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the LLM augmentation call.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    /// Provider default when `None`.
    pub base_url: Option<String>,
    /// Provider default when `None`.
    pub model: Option<String>,
    /// Default: 0.4.
    pub temperature: f32,
    /// Default: 2048. Only the Anthropic API requires it.
    pub max_tokens: u32,
    /// HTTP timeout for the single completion request. Default: 120.
    pub timeout_secs: u64,
    /// Structural instructions appended to the user prompt; the built-in
    /// deck prompt when `None`.
    pub prompt: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            model: None,
            temperature: 0.4,
            max_tokens: 2048,
            timeout_secs: 120,
            prompt: None,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("prompt", &self.prompt.as_ref().map(|p| p.len()))
            .finish()
    }
}

impl LlmSettings {
    pub fn resolved_base_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| self.provider.default_base_url().map(str::to_string))
    }

    pub fn resolved_model(&self) -> String {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
            .to_string()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Check that a client can be built from these settings.
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.api_key().is_none() {
            return Err(DeckError::ProviderNotConfigured {
                provider: self.provider.to_string(),
                hint: "Set an API key with --api-key or PAPER2DECK_API_KEY.".into(),
            });
        }
        if self.resolved_base_url().is_none() {
            return Err(DeckError::ProviderNotConfigured {
                provider: self.provider.to_string(),
                hint: "This provider needs an explicit base URL (--base-url).".into(),
            });
        }
        Ok(())
    }
}

// ── Deck configuration ───────────────────────────────────────────────────

/// Configuration for one deck generation.
///
/// ```rust
/// use paper2deck::{DeckConfig, DeckMode};
///
/// let config = DeckConfig::builder()
///     .target_slides(10)
///     .mode(DeckMode::Static)
///     .build()
///     .unwrap();
/// assert_eq!(config.target_slides, 10);
/// ```
#[derive(Clone)]
pub struct DeckConfig {
    /// Total frames requested, 6–30. Default: 12.
    pub target_slides: u32,
    /// Default: static.
    pub mode: DeckMode,
    pub llm: LlmSettings,
    /// Figures to place after generation.
    pub figures: Vec<FigureDescriptor>,
    /// Pre-built client; takes precedence over `llm`.
    pub client: Option<Arc<dyn ChatCompletionClient>>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            target_slides: DEFAULT_TARGET_SLIDES,
            mode: DeckMode::Static,
            llm: LlmSettings::default(),
            figures: Vec::new(),
            client: None,
        }
    }
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("target_slides", &self.target_slides)
            .field("mode", &self.mode)
            .field("llm", &self.llm)
            .field("figures", &self.figures.len())
            .field(
                "client",
                &self.client.as_ref().map(|c| c.provider().to_string()),
            )
            .finish()
    }
}

impl DeckConfig {
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DeckConfig`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn target_slides(mut self, n: u32) -> Self {
        self.config.target_slides = n.clamp(MIN_TARGET_SLIDES, MAX_TARGET_SLIDES);
        self
    }

    pub fn mode(mut self, mode: DeckMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn llm(mut self, settings: LlmSettings) -> Self {
        self.config.llm = settings;
        self
    }

    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.llm.base_url = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.llm.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.llm.max_tokens = n.max(1);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.llm.timeout_secs = secs.max(1);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.llm.prompt = Some(prompt.into());
        self
    }

    pub fn figures(mut self, figures: Vec<FigureDescriptor>) -> Self {
        self.config.figures = figures;
        self
    }

    pub fn client(mut self, client: Arc<dyn ChatCompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Validate and return the configuration.
    ///
    /// LLM mode without a pre-built client needs an API key and a base URL.
    pub fn build(self) -> Result<DeckConfig, DeckError> {
        let c = &self.config;
        if !(MIN_TARGET_SLIDES..=MAX_TARGET_SLIDES).contains(&c.target_slides) {
            return Err(DeckError::InvalidConfig(format!(
                "target slides must be {MIN_TARGET_SLIDES}–{MAX_TARGET_SLIDES}, got {}",
                c.target_slides
            )));
        }
        if c.mode == DeckMode::Llm && c.client.is_none() {
            c.llm.validate()?;
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_slides_parse_leniently() {
        assert_eq!(parse_target_slides("8"), 8);
        assert_eq!(parse_target_slides(" 30 "), 30);
        assert_eq!(parse_target_slides("5"), DEFAULT_TARGET_SLIDES);
        assert_eq!(parse_target_slides("31"), DEFAULT_TARGET_SLIDES);
        assert_eq!(parse_target_slides("ten"), DEFAULT_TARGET_SLIDES);
        assert_eq!(parse_target_slides(""), DEFAULT_TARGET_SLIDES);
    }

    #[test]
    fn deck_mode_parses() {
        assert_eq!("LLM".parse::<DeckMode>(), Ok(DeckMode::Llm));
        assert_eq!(" static ".parse::<DeckMode>(), Ok(DeckMode::Static));
        assert!("hybrid".parse::<DeckMode>().is_err());
    }

    #[test]
    fn unknown_provider_is_openai() {
        assert_eq!(ProviderKind::from_name("Anthropic"), ProviderKind::Anthropic);
        assert_eq!(ProviderKind::from_name("deepseek"), ProviderKind::DeepSeek);
        assert_eq!(ProviderKind::from_name("mistral"), ProviderKind::OpenAi);
    }

    #[test]
    fn provider_defaults() {
        let settings = LlmSettings {
            provider: ProviderKind::Anthropic,
            ..LlmSettings::default()
        };
        assert_eq!(
            settings.resolved_base_url().as_deref(),
            Some("https://api.anthropic.com/v1")
        );
        assert_eq!(settings.resolved_model(), "claude-3-5-sonnet-latest");
        assert!(ProviderKind::Azure.default_base_url().is_none());
    }

    #[test]
    fn builder_clamps_target() {
        let c = DeckConfig::builder().target_slides(100).build().unwrap();
        assert_eq!(c.target_slides, MAX_TARGET_SLIDES);
        let c = DeckConfig::builder().target_slides(1).build().unwrap();
        assert_eq!(c.target_slides, MIN_TARGET_SLIDES);
    }

    #[test]
    fn llm_mode_requires_key() {
        let err = DeckConfig::builder()
            .mode(DeckMode::Llm)
            .build()
            .unwrap_err();
        assert!(matches!(err, DeckError::ProviderNotConfigured { .. }));
    }

    #[test]
    fn azure_requires_base_url() {
        let err = DeckConfig::builder()
            .mode(DeckMode::Llm)
            .provider(ProviderKind::Azure)
            .api_key("k")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("base URL"));

        let ok = DeckConfig::builder()
            .mode(DeckMode::Llm)
            .provider(ProviderKind::Azure)
            .api_key("k")
            .base_url("https://x.openai.azure.com/openai/deployments/d?api-version=2024-02-01")
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = DeckConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
