use std::fmt;

/// Status codes that count as a live link. Redirects are not followed, so
/// the common redirect codes are accepted as they are.
pub const GOOD_RESPONSE: [u16; 4] = [200, 300, 301, 302];

/// Outcome of validating a single link, decided once at classification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    StatusCode(u16),
    ConnectionError,
    TimeoutError,
    InvalidSchema,
    Other(String),
}

impl ValidationResult {
    pub fn is_good(&self) -> bool {
        matches!(self, ValidationResult::StatusCode(code) if GOOD_RESPONSE.contains(code))
    }

    pub fn is_broken(&self) -> bool {
        !self.is_good()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::StatusCode(code) => write!(f, "{}", code),
            ValidationResult::ConnectionError => f.write_str("Connection Error"),
            ValidationResult::TimeoutError => f.write_str("Timeout Error"),
            ValidationResult::InvalidSchema => f.write_str("Invalid Schema"),
            ValidationResult::Other(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_statuses() {
        for code in GOOD_RESPONSE {
            assert!(ValidationResult::StatusCode(code).is_good());
        }
    }

    #[test]
    fn test_broken_statuses() {
        assert!(ValidationResult::StatusCode(404).is_broken());
        assert!(ValidationResult::StatusCode(303).is_broken());
        assert!(ValidationResult::StatusCode(500).is_broken());
        assert!(ValidationResult::ConnectionError.is_broken());
        assert!(ValidationResult::TimeoutError.is_broken());
        assert!(ValidationResult::InvalidSchema.is_broken());
        assert!(ValidationResult::Other("MissingSchema".to_string()).is_broken());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationResult::StatusCode(404).to_string(), "404");
        assert_eq!(ValidationResult::ConnectionError.to_string(), "Connection Error");
        assert_eq!(ValidationResult::TimeoutError.to_string(), "Timeout Error");
        assert_eq!(ValidationResult::InvalidSchema.to_string(), "Invalid Schema");
        assert_eq!(
            ValidationResult::Other("TooManyRedirects".to_string()).to_string(),
            "TooManyRedirects"
        );
    }
}
