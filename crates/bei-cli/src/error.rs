use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] bei_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("exchange rate unavailable: {0}")]
    Rate(#[from] bei_core::RateError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Rate(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_errors_map_to_exit_code_three() {
        let error = CliError::Rate(bei_core::RateError::UpstreamStatus(503));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn command_errors_map_to_exit_code_two() {
        let error = CliError::Command(String::from("buying price must be positive"));
        assert_eq!(error.exit_code(), 2);
    }
}
