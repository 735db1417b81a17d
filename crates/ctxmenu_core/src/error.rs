//! Error types for the context menu engine.
//!
//! Runtime menu operations are permissive and never fail. Errors only surface while
//! building an engine: resolving its menu markup and validating its options.

use thiserror::Error;

/// Main error type for menu construction and configuration loading.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The configured menu root does not exist in the document.
    #[error("Menu not found: {menu_id}")]
    MenuNotFound {
        /// The menu id that failed to resolve.
        menu_id: String,
    },

    /// A configuration option holds an unusable value.
    #[error("Invalid option `{option}`: {message}")]
    InvalidOption {
        /// Name of the offending option.
        option: &'static str,
        /// Human-readable error message.
        message: String,
    },

    /// Menu markup or an options file could not be parsed.
    #[error("Markup error: {message}")]
    Markup {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading a configuration or fixture file failed.
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MenuError {
    // ========== Constructors ==========

    /// Create a menu-not-found error.
    pub fn menu_not_found(menu_id: impl Into<String>) -> Self {
        Self::MenuNotFound { menu_id: menu_id.into() }
    }

    /// Create an invalid option error.
    pub fn invalid_option(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption { option, message: message.into() }
    }

    /// Create a markup error without a source.
    pub fn markup(message: impl Into<String>) -> Self {
        Self::Markup { message: message.into(), source: None }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MenuNotFound { .. } => "Menu",
            Self::InvalidOption { .. } => "Config",
            Self::Markup { .. } => "Markup",
            Self::Io { .. } => "I/O",
        }
    }

    /// Get an actionable hint for the caller.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::MenuNotFound { .. } => Some("Check that the menu id exists in the page markup"),
            Self::InvalidOption { .. } => Some("Fix the option value or remove it to use the default"),
            Self::Markup { .. } => Some("The markup file may be malformed"),
            Self::Io { .. } => Some("Check the file path and permissions"),
        }
    }
}

// ========== Error Conversions ==========

/// Convert from serde_json::Error to MenuError.
impl From<serde_json::Error> for MenuError {
    fn from(err: serde_json::Error) -> Self {
        MenuError::Markup { message: format!("JSON error: {err}"), source: Some(Box::new(err)) }
    }
}

/// Convert from std::io::Error to MenuError.
impl From<std::io::Error> for MenuError {
    fn from(err: std::io::Error) -> Self {
        MenuError::Io { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_not_found_display() {
        let err = MenuError::menu_not_found("torrentsTableMenu");
        assert_eq!(err.to_string(), "Menu not found: torrentsTableMenu");
        assert_eq!(err.category(), "Menu");
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_json_error_converts_to_markup() {
        let err: MenuError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, MenuError::Markup { source: Some(_), .. }));
        assert!(err.to_string().starts_with("Markup error: JSON error"));
    }
}
