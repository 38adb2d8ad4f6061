#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Annotation '{kind}' is missing required field '{field}'")]
    MissingGeometry { kind: String, field: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest embeds {count} segment group payload(s); package it as an archive")]
    EmbeddedPayload { count: usize },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    #[error("Unknown user '{0}'")]
    UnknownUser(String),
}

impl AppError {
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_validation() {
        let err = AppError::Validation("at least one data source is required".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: at least one data source is required"
        );
    }

    #[test]
    fn test_display_missing_geometry() {
        let err = AppError::MissingGeometry {
            kind: "rectangle".into(),
            field: "secondPoint".into(),
        };
        assert_eq!(
            err.to_string(),
            "Annotation 'rectangle' is missing required field 'secondPoint'"
        );
    }

    #[test]
    fn test_display_invalid_manifest() {
        let err = AppError::InvalidManifest("dataset 'volume' references data source 7".into());
        assert_eq!(
            err.to_string(),
            "Invalid manifest: dataset 'volume' references data source 7"
        );
    }

    #[test]
    fn test_display_embedded_payload() {
        let err = AppError::EmbeddedPayload { count: 2 };
        assert_eq!(
            err.to_string(),
            "Manifest embeds 2 segment group payload(s); package it as an archive"
        );
    }

    #[test]
    fn test_display_not_found() {
        let err = AppError::not_found("Session", "64f0c2");
        assert_eq!(err.to_string(), "Session '64f0c2' not found");
    }

    #[test]
    fn test_display_unknown_user() {
        let err = AppError::UnknownUser("alice".into());
        assert_eq!(err.to_string(), "Unknown user 'alice'");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = AppError::not_found("Folder", "f1").into();
        let err = err.context("resolving session");
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::NotFound { .. })
        ));
    }
}
