use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorstOfError {
    #[error("Insufficient data for {underlying}: need at least {required} observations, found {found}")]
    InsufficientData {
        underlying: String,
        required: usize,
        found: usize,
    },

    #[error("Empty basket: at least one underlying is required")]
    EmptyBasket,

    #[error("Invalid config: {field} — {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Missing underlying: no price series for '{0}'")]
    MissingUnderlying(String),

    #[error("Invalid series {underlying}: {reason}")]
    InvalidSeries { underlying: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WorstOfError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        WorstOfError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(underlying: &str, required: usize, found: usize) -> Self {
        WorstOfError::InsufficientData {
            underlying: underlying.to_string(),
            required,
            found,
        }
    }
}

impl From<serde_json::Error> for WorstOfError {
    fn from(e: serde_json::Error) -> Self {
        WorstOfError::Serialization(e.to_string())
    }
}
