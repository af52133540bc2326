//! Core error types for the Tableau composer.

/// A specialized Result type for Tableau operations.
pub type TableauResult<T> = Result<T, TableauError>;

/// Top-level error type encompassing all Tableau subsystems.
#[derive(Debug, thiserror::Error)]
pub enum TableauError {
    /// An element (or step) referenced an anchor that has not been constructed yet.
    #[error("missing anchor: '{element}' references '{anchor}', which has not been constructed")]
    MissingAnchor { element: String, anchor: String },

    #[error("construction error: {0}")]
    Construction(String),

    #[error("scene validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TableauError {
    /// Create a missing-anchor error.
    pub fn missing_anchor(element: impl Into<String>, anchor: impl Into<String>) -> Self {
        TableauError::MissingAnchor {
            element: element.into(),
            anchor: anchor.into(),
        }
    }

    /// Create a construction error.
    pub fn construction(message: impl Into<String>) -> Self {
        TableauError::Construction(message.into())
    }

    /// True for the two unrecoverable scene-build error kinds.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            TableauError::MissingAnchor { .. } | TableauError::Construction(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_anchor_display() {
        let err = TableauError::missing_anchor("attention_scores", "matrices");
        assert_eq!(
            err.to_string(),
            "missing anchor: 'attention_scores' references 'matrices', which has not been constructed"
        );
        assert!(err.is_construction());
    }

    #[test]
    fn test_construction_error_display() {
        let err = TableauError::construction("grid 'q' is empty");
        assert_eq!(err.to_string(), "construction error: grid 'q' is empty");
        assert!(err.is_construction());
        assert!(!TableauError::Render("boom".into()).is_construction());
    }
}
