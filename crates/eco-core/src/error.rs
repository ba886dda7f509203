//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing configuration key {key} in namespace '{namespace}'")]
    MissingKey { namespace: String, key: String },

    #[error("Missing configuration namespace '{0}'")]
    MissingNamespace(String),

    #[error("Invalid value {value} for configuration key {key} in namespace '{namespace}'")]
    InvalidValue {
        namespace: String,
        key: String,
        value: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid cell coordinates ({x}, {y}) for board of size {size}")]
    OutOfBounds { x: i32, y: i32, size: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_the_key() {
        let err = Error::MissingKey {
            namespace: "world".to_string(),
            key: "BOARD_SIZE".to_string(),
        };
        assert!(err.to_string().contains("BOARD_SIZE"));
        assert!(err.to_string().contains("world"));
    }

    #[test]
    fn test_bounds_error_message() {
        let err = Error::OutOfBounds { x: -1, y: 0, size: 10 };
        assert_eq!(
            err.to_string(),
            "Invalid cell coordinates (-1, 0) for board of size 10"
        );
    }
}
