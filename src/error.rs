//! Error types for configuration loading, validation and command building.

use thiserror::Error;

/// Result alias for configuration-facing operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Every failure the configuration layer can surface.
///
/// `Load` and `Io` are both load failures; `Validation` carries the complete
/// ordered issue list; `Interpolation` aborts command construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source is missing, malformed, or has a non-mapping top level.
    #[error("failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    /// A source exists but could not be read.
    #[error("failed to read {source_name}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The merged document failed validation.
    #[error("configuration is invalid:\n{}", format_issues(.issues))]
    Validation { issues: Vec<String> },

    /// A flag template referenced an unsupported placeholder.
    #[error("unsupported placeholder '%{{{placeholder}}}' in flag template '{template}'")]
    Interpolation {
        template: String,
        placeholder: String,
    },
}

impl ConfigError {
    pub fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// True for failures raised while reading or parsing a source.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Io { .. })
    }

    /// The collected validation issues, if this is a validation failure.
    pub fn issues(&self) -> Option<&[String]> {
        match self {
            Self::Validation { issues } => Some(issues),
            _ => None,
        }
    }
}

fn format_issues(issues: &[String]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_issue() {
        let err = ConfigError::Validation {
            issues: vec![
                "questions[0]: missing id".to_string(),
                "questions: duplicate id 'api' (2 occurrences)".to_string(),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("questions[0]: missing id"));
        assert!(text.contains("duplicate id 'api' (2 occurrences)"));
        assert_eq!(err.issues().map(|i| i.len()), Some(2));
    }

    #[test]
    fn test_interpolation_display_names_template() {
        let err = ConfigError::Interpolation {
            template: "--x=%{bogus}".to_string(),
            placeholder: "bogus".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported placeholder '%{bogus}' in flag template '--x=%{bogus}'"
        );
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_load_failures_classified() {
        assert!(ConfigError::load("base", "not found").is_load_failure());
        let io = ConfigError::Io {
            source_name: "user".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(io.is_load_failure());
    }
}
