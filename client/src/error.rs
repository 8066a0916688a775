use thiserror::Error;

/// Errors returned to the bot program.
///
/// `Aborted` and `Interrupted` are cancellations rather than failures: a
/// handler should pass them on with `?` so its stack unwinds.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Blocking commands can only be issued from the bot thread")]
    NotBotThread,

    #[error("No tick has been received yet")]
    NoTickYet,

    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },

    #[error("At most {max} team messages can be sent per turn")]
    TeamMessageLimit { max: usize },

    #[error("Team message is {size} bytes, the limit is {max}")]
    TeamMessageTooLarge { size: usize, max: usize },

    #[error("Team message could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Event handler interrupted by a newer event")]
    Interrupted,

    #[error("Bot is no longer running")]
    Aborted,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl BotError {
    /// True for the errors that only unwind the bot program
    pub fn is_cancellation(&self) -> bool {
        matches!(self, BotError::Interrupted | BotError::Aborted)
    }
}

/// Reject NaN; infinities are allowed and mean "keep going"
pub(crate) fn check_not_nan(name: &'static str, value: f64) -> Result<f64, BotError> {
    if value.is_nan() {
        return Err(BotError::InvalidValue { name, value });
    }
    Ok(value)
}

/// Reject NaN and infinities
pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, BotError> {
    if !value.is_finite() {
        return Err(BotError::InvalidValue { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation() {
        assert!(BotError::Aborted.is_cancellation());
        assert!(BotError::Interrupted.is_cancellation());
        assert!(!BotError::NoTickYet.is_cancellation());
    }

    #[test]
    fn test_value_checks() {
        assert_eq!(check_not_nan("distance", f64::INFINITY).ok(), Some(f64::INFINITY));
        assert!(check_not_nan("distance", f64::NAN).is_err());
        assert!(check_finite("rate", f64::NEG_INFINITY).is_err());
        assert_eq!(check_finite("rate", -3.5).ok(), Some(-3.5));
    }

    #[test]
    fn test_display() {
        let err = BotError::InvalidValue {
            name: "firepower",
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "Invalid firepower: inf");
    }
}
