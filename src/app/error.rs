use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// User input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("You have reached the limit of {limit} saved {noun}.")]
    CapacityExceeded { limit: usize, noun: &'static str },

    #[error("{0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl DashError {
    /// Errors the user can fix by changing their input or setup, as opposed
    /// to transport failures which are reported with a generic message.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            DashError::Validation(_)
                | DashError::CapacityExceeded { .. }
                | DashError::Unauthorized(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = DashError::CapacityExceeded {
            limit: 8,
            noun: "repositories",
        };
        assert_eq!(
            err.to_string(),
            "You have reached the limit of 8 saved repositories."
        );
        assert!(err.is_notice());
    }

    #[test]
    fn test_upstream_is_not_notice() {
        let err = DashError::Upstream {
            status: 500,
            url: "https://api.github.com".into(),
        };
        assert!(!err.is_notice());
    }
}
