use rr_types::TypeError;

/// Errors from timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("unknown roast level: {0:?}")]
    UnknownRoastLevel(String),

    #[error(transparent)]
    Type(TypeError),
}

impl From<TypeError> for TimerError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownRoastLevel(name) => Self::UnknownRoastLevel(name),
            other => Self::Type(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roast_error_keeps_its_name() {
        let err = TimerError::from(TypeError::UnknownRoastLevel("burnt".into()));
        assert_eq!(err, TimerError::UnknownRoastLevel("burnt".into()));
        assert_eq!(err.to_string(), "unknown roast level: \"burnt\"");
    }

    #[test]
    fn other_type_errors_pass_through() {
        let source = TypeError::UnknownTheme("sepia".into());
        let err = TimerError::from(source.clone());
        assert_eq!(err, TimerError::Type(source.clone()));
        assert_eq!(err.to_string(), source.to_string());
    }
}
