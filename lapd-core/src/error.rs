use thiserror::Error;

/// Failures with a known meaning to the user or operator.
///
/// Recoverable variants are shown to the invoking member as an ephemeral
/// error embed. Fatal variants abort startup or are logged as internal errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("You are on cooldown. Try again in {remaining_secs}s.")]
    Cooldown { remaining_secs: u64 },
    #[error("{service} is unavailable right now. Please try again later.")]
    External { service: &'static str },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Database(_))
    }

    /// Embed title for recoverable errors.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Not Found",
            Self::Validation(_) => "Invalid Input",
            Self::Conflict(_) => "Conflict",
            Self::Forbidden(_) => "Missing Permissions",
            Self::Cooldown { .. } => "Slow Down",
            Self::External { .. } => "Service Unavailable",
            Self::Config(_) | Self::Database(_) => "Command Error",
        }
    }
}

/// Find an [`AppError`] anywhere in an error chain.
pub fn classify(error: &anyhow::Error) -> Option<&AppError> {
    error.chain().find_map(|cause| cause.downcast_ref::<AppError>())
}

#[cfg(test)]
mod tests {
    use anyhow::Context as _;

    use super::{AppError, classify};

    #[test]
    fn fatal_split() {
        assert!(!AppError::validation("bad").is_fatal());
        assert!(!AppError::Cooldown { remaining_secs: 3 }.is_fatal());
        assert!(AppError::Config("DISCORD_TOKEN missing".to_owned()).is_fatal());
        assert!(AppError::Database("refused".to_owned()).is_fatal());
    }

    #[test]
    fn classify_walks_context() {
        let error = Err::<(), _>(AppError::not_found("No arrest #4."))
            .context("loading arrest")
            .unwrap_err();

        let found = classify(&error).expect("app error in chain");
        assert_eq!(found.to_string(), "No arrest #4.");
        assert_eq!(found.title(), "Not Found");
        assert!(classify(&anyhow::anyhow!("plain")).is_none());
    }

    #[test]
    fn cooldown_message_includes_remaining_seconds() {
        assert_eq!(
            AppError::Cooldown { remaining_secs: 4 }.to_string(),
            "You are on cooldown. Try again in 4s."
        );
    }
}
