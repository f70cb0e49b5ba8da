use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration ({context}): {message}")]
    Configuration {
        context: &'static str,
        message: String,
    },
    #[error("alignment invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn configuration(context: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            context,
            message: message.into(),
        }
    }

    pub(crate) fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// True for failures raised while loading or validating resources,
    /// as opposed to defects detected during alignment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Json { .. } | Self::Configuration { .. }
        )
    }
}
