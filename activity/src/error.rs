use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("malformed activity payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ActivityError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
