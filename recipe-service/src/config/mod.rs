use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_HF_BASE_URL: &str = "https://router.huggingface.co/v1";
const DEFAULT_DIST_DIR: &str = "client/dist";
const DEFAULT_INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct RecipeConfig {
    pub common: core_config::Config,
    pub log_level: String,
    /// OTLP collector; spans are only exported when set.
    pub otlp_endpoint: Option<String>,
    pub provider: ProviderConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Maximum output tokens per completion.
    pub max_tokens: u32,
    pub huggingface: HuggingFaceConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    HuggingFace,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown RECIPE_PROVIDER '{}', expected 'huggingface' or 'mock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Outside production a missing token is not a startup error; completion
    /// calls fail instead.
    pub access_token: Option<Secret<String>>,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Directory holding the pre-built front-end bundle.
    pub dist_dir: PathBuf,
    pub index_file: String,
}

impl FrontendConfig {
    pub fn index_path(&self) -> PathBuf {
        self.dist_dir.join(&self.index_file)
    }
}

impl RecipeConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let is_prod = get("ENVIRONMENT").is_some_and(|v| v.trim() == "prod");

        let kind = get("RECIPE_PROVIDER")
            .map(|v| v.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or(ProviderKind::HuggingFace);

        // The mock never calls upstream, so it runs without a token anywhere.
        let access_token = get_env(
            "HF_ACCESS_TOKEN",
            get("HF_ACCESS_TOKEN"),
            is_prod && kind == ProviderKind::HuggingFace,
        )?;

        Ok(RecipeConfig {
            common,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: get("OTLP_ENDPOINT"),
            provider: ProviderConfig {
                kind,
                model: get("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: parse_or("HF_MAX_TOKENS", get("HF_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?,
                huggingface: HuggingFaceConfig {
                    access_token: access_token.map(Secret::new),
                    base_url: get("HF_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_HF_BASE_URL.to_string()),
                    timeout_secs: get("HF_TIMEOUT_SECS")
                        .map(|v| parse_value("HF_TIMEOUT_SECS", &v))
                        .transpose()?,
                },
            },
            frontend: FrontendConfig {
                dist_dir: get("FRONTEND_DIST_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
                index_file: get("FRONTEND_INDEX_FILE")
                    .unwrap_or_else(|| DEFAULT_INDEX_FILE.to_string()),
            },
        })
    }
}

/// Read an optional variable that becomes mandatory in production.
fn get_env(key: &str, value: Option<String>, is_prod: bool) -> Result<Option<String>, AppError> {
    match value {
        Some(val) => Ok(Some(val)),
        None if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        None => Ok(None),
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => parse_value(key, &v),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RecipeConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RecipeConfig::from_lookup(core_config::Config { port: 0 }, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.provider.kind, ProviderKind::HuggingFace);
        assert_eq!(config.provider.model, "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(config.provider.max_tokens, 1024);
        assert!(config.provider.huggingface.access_token.is_none());
        assert!(config.provider.huggingface.timeout_secs.is_none());
        assert_eq!(config.frontend.index_path(), PathBuf::from("client/dist/index.html"));
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HF_ACCESS_TOKEN", "hf_secret"),
            ("HF_MODEL", "meta-llama/Llama-3.1-8B-Instruct"),
            ("HF_MAX_TOKENS", "512"),
            ("HF_TIMEOUT_SECS", "30"),
            ("RECIPE_PROVIDER", "mock"),
            ("FRONTEND_DIST_DIR", "/srv/app"),
        ])
        .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Mock);
        assert_eq!(config.provider.model, "meta-llama/Llama-3.1-8B-Instruct");
        assert_eq!(config.provider.max_tokens, 512);
        assert_eq!(config.provider.huggingface.timeout_secs, Some(30));
        assert_eq!(
            config
                .provider
                .huggingface
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().as_str()),
            Some("hf_secret")
        );
        assert_eq!(config.frontend.index_path(), PathBuf::from("/srv/app/index.html"));
    }

    #[test]
    fn test_blank_token_is_treated_as_missing() {
        let config = load(&[("HF_ACCESS_TOKEN", "  ")]).unwrap();
        assert!(config.provider.huggingface.access_token.is_none());
    }

    #[test]
    fn test_production_requires_access_token() {
        let err = load(&[("ENVIRONMENT", "prod")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("HF_ACCESS_TOKEN"));

        let err = load(&[("ENVIRONMENT", "prod"), ("HF_ACCESS_TOKEN", " ")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_production_with_access_token_loads() {
        let config = load(&[("ENVIRONMENT", "prod"), ("HF_ACCESS_TOKEN", "hf_secret")]).unwrap();
        assert!(config.provider.huggingface.access_token.is_some());
    }

    #[test]
    fn test_production_mock_does_not_need_token() {
        let config = load(&[("ENVIRONMENT", "prod"), ("RECIPE_PROVIDER", "mock")]).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Mock);
        assert!(config.provider.huggingface.access_token.is_none());
    }

    #[test]
    fn test_dev_without_token_loads() {
        let config = load(&[("ENVIRONMENT", "dev")]).unwrap();
        assert!(config.provider.huggingface.access_token.is_none());
    }

    #[test]
    fn test_invalid_max_tokens_is_config_error() {
        let err = load(&[("HF_MAX_TOKENS", "lots")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("HF_MAX_TOKENS"));
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = load(&[("RECIPE_PROVIDER", "openai")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
