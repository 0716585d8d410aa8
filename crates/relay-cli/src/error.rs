use std::path::PathBuf;

use relay_chain::ChainError;
use relay_checkout::CheckoutError;
use relay_saga::SagaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("rate-limit max-requests must be at least 1")]
    ZeroMaxRequests,

    #[error("rate-limit window-ms must be at least 1")]
    ZeroWindow,

    #[error("approval needs at least one tier")]
    NoTiers,

    #[error("approval tiers '{first}' and '{second}' share the limit {limit}")]
    DuplicateTierLimit {
        first: String,
        second: String,
        limit: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("header '{0}' must look like 'Name: value'")]
    InvalidHeader(String),

    #[error("request body is not valid JSON")]
    InvalidBody(#[source] serde_json::Error),

    #[error("{rejected} of {total} request(s) rejected")]
    Rejected {
        rejected: u32,
        total: u32,
        #[source]
        last: ChainError,
    },

    #[error("no approval tiers configured")]
    NoApprovalTiers,

    #[error("expense was not approved")]
    NotApproved(#[source] ChainError),

    #[error("checkout failed")]
    Checkout(#[from] SagaError<CheckoutError>),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use relay_chain::Rejection;

    use super::*;

    #[test]
    fn read_error_includes_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/relay.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };

        assert!(err.to_string().contains("/etc/relay.toml"));
    }

    #[test]
    fn config_error_converts_via_from() {
        let cli_err: CliError = ConfigError::NoTiers.into();

        assert!(matches!(cli_err, CliError::Config(ConfigError::NoTiers)));
        assert!(std::error::Error::source(&cli_err).is_some());
    }

    #[test]
    fn rejected_error_chains_to_last_rejection() {
        let err = CliError::Rejected {
            rejected: 1,
            total: 4,
            last: ChainError::rejected("rate_limit", Rejection::Custom("slow down".into())),
        };

        assert_eq!(err.to_string(), "1 of 4 request(s) rejected");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("request rejected by 'rate_limit'"));
    }

    #[test]
    fn checkout_error_keeps_saga_message() {
        let saga_err = SagaError::StepFailed {
            step: "Ship".to_string(),
            source: CheckoutError::Injected("Ship".to_string()),
        };

        let cli_err: CliError = saga_err.into();

        let source = std::error::Error::source(&cli_err).map(ToString::to_string);
        assert!(source.is_some_and(|msg| msg.contains("rolled back cleanly")));
    }
}
