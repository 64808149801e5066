//! Error types for chrono-ring.
//!
//! Only widget construction and configuration loading can fail. Values typed
//! into the minute and second fields never produce errors; they are normalized
//! by [`crate::countdown::normalize_duration`] instead.

/// Errors raised while building widgets from markup or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ChronoError {
    /// The widget markup lacks one of the required controls.
    #[error("chrono widget '{widget}' has no element with class '{class}'")]
    MissingElement {
        /// Identifier of the widget container.
        widget: String,
        /// CSS-like class of the missing element.
        class: &'static str,
    },

    /// The drawing surface of a widget has no area.
    #[error("chrono widget '{widget}' has an empty canvas ({width}x{height})")]
    InvalidCanvas {
        /// Identifier of the widget container.
        widget: String,
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// The plugin configuration could not be parsed.
    #[error("invalid chrono configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used by fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, ChronoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_message() {
        let err = ChronoError::MissingElement {
            widget: "intro".to_string(),
            class: "chrono_play",
        };
        assert_eq!(
            err.to_string(),
            "chrono widget 'intro' has no element with class 'chrono_play'"
        );
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ChronoError = parse_err.into();
        assert!(matches!(err, ChronoError::Config(_)));
        assert!(err.to_string().starts_with("invalid chrono configuration"));
    }
}
