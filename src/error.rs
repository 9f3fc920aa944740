//! Errors surfaced to the user.
//!
//! Setup code returns [`anyhow::Error`]; the only error the viewer shows to the
//! user is [`LoadError`], produced while fetching or parsing the model file.

use thiserror::Error;

/// Failure to fetch or parse the model file.
///
/// The `Display` form is the diagnostic part of the banner text. Use
/// [`LoadError::banner_message`] for the full user-facing message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {file}: {reason}")]
    Fetch { file: String, reason: String },
    #[error("request for {file} failed with HTTP status {status}")]
    Status { file: String, status: u16 },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{file} contains no triangles")]
    Empty { file: String },
}

impl LoadError {
    pub const BANNER_PREFIX: &'static str = "Error loading model: ";

    pub fn banner_message(&self) -> String {
        format!("{}{}", Self::BANNER_PREFIX, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_message_is_prefixed() {
        let err = LoadError::Empty {
            file: "nothing.obj".to_string(),
        };
        let msg = err.banner_message();
        assert!(msg.starts_with("Error loading model:"));
        assert!(msg.contains("nothing.obj"));
    }

    #[test]
    fn status_error_names_the_code() {
        let err = LoadError::Status {
            file: "missing.obj".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("404"));
    }
}
