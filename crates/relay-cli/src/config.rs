use std::path::{Path, PathBuf};
use std::time::Duration;

use relay_chain::{ApprovalTier, PipelineSettings, default_tiers};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Read from the working directory when no path is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "relay.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    pipeline: Option<RawPipeline>,
    rate_limit: Option<RawRateLimit>,
    approval: Option<RawApproval>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawPipeline {
    required_role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawRateLimit {
    max_requests: Option<u32>,
    window_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApproval {
    tiers: Vec<ApprovalTier>,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pipeline: PipelineSettings,
    tiers: Vec<ApprovalTier>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            tiers: default_tiers(),
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds values that fail validation.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::parse(&content, &path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = PipelineSettings::default();

        let required_role = raw
            .pipeline
            .and_then(|pipeline| pipeline.required_role)
            .unwrap_or(defaults.required_role);

        let (max_requests, window) = match raw.rate_limit {
            None => (defaults.max_requests, defaults.window),
            Some(limit) => (
                limit.max_requests.unwrap_or(defaults.max_requests),
                limit.window_ms.map_or(defaults.window, Duration::from_millis),
            ),
        };
        if max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }

        let tiers = match raw.approval {
            None => default_tiers(),
            Some(approval) => validate_tiers(approval.tiers)?,
        };

        Ok(Self {
            pipeline: PipelineSettings {
                required_role,
                max_requests,
                window,
            },
            tiers,
        })
    }

    #[must_use]
    pub(crate) fn pipeline(&self) -> &PipelineSettings {
        &self.pipeline
    }

    #[must_use]
    pub(crate) fn tiers(&self) -> &[ApprovalTier] {
        &self.tiers
    }
}

fn validate_tiers(mut tiers: Vec<ApprovalTier>) -> Result<Vec<ApprovalTier>, ConfigError> {
    if tiers.is_empty() {
        return Err(ConfigError::NoTiers);
    }
    tiers.sort_by_key(ApprovalTier::limit);
    if let Some(pair) = tiers.windows(2).find(|pair| pair[0].limit() == pair[1].limit()) {
        return Err(ConfigError::DuplicateTierLimit {
            first: pair[0].title().to_string(),
            second: pair[1].title().to_string(),
            limit: pair[0].limit().to_string(),
        });
    }
    Ok(tiers)
}
