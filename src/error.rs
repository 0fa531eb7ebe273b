use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, decoding or loading recipes
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl RecipeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        RecipeError::MalformedData(msg.into())
    }

    pub fn missing(field: &str) -> Self {
        RecipeError::MissingField(field.to_string())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecipeError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = RecipeError::missing("ingredients");
        assert_eq!(err.to_string(), "missing field `ingredients`");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = RecipeError::io(
            "data/recipes",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("data/recipes"));
        assert!(err.to_string().contains("gone"));
    }
}
