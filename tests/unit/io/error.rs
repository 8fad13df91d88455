//! Tests for error formatting and source chaining

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use unlockgen::GeneratorError;
    use unlockgen::io::error::{file_system_error, invalid_grid, invalid_parameter};

    // Tests display formatting of validation errors
    // Verified by changing the message templates
    #[test]
    fn test_validation_error_display() {
        let error = invalid_parameter("path_count", &7, &"must be between 1 and 4");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'path_count' = '7': must be between 1 and 4"
        );
        assert!(error.source().is_none());

        let error = invalid_grid(&"layout has no cells");
        assert_eq!(error.to_string(), "Invalid grid layout: layout has no cells");
        assert!(error.source().is_none());
    }

    // Tests that file system errors keep their path and cause
    // Verified by returning None from source
    #[test]
    fn test_file_system_error_chain() {
        let error = file_system_error(
            "boards/board_1.json",
            "write",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        let message = error.to_string();
        assert!(message.contains("write"));
        assert!(message.contains("boards/board_1.json"));
        assert!(message.contains("denied"));
        assert!(error.source().is_some());
    }

    // Tests that wrapped I/O errors carry the real path and operation
    // Verified by storing a placeholder path in file_system_error
    #[test]
    fn test_file_system_error_fields() {
        let error = file_system_error("out/preview.png", "create", io::Error::other("boom"));
        assert!(matches!(
            error,
            GeneratorError::FileSystem { ref path, operation: "create", .. }
                if *path == PathBuf::from("out/preview.png")
        ));
    }

    // Tests that serialization errors expose the serde cause
    // Verified by formatting without the document path
    #[test]
    fn test_serialization_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated json");
        let error = GeneratorError::Serialization {
            path: PathBuf::from("config.json"),
            source,
        };
        assert!(error.to_string().starts_with("Malformed JSON document 'config.json'"));
        assert!(error.source().is_some());
    }
}
