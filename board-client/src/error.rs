use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // Сервер отклонил запрос и вернул { msg }
    #[error("{msg}")]
    Rejected { status: u16, msg: String },

    // Ответ без ожидаемых полей
    #[error("Malformed response (HTTP {status}): {body}")]
    Malformed { status: u16, body: String },

    // Транспортные ошибки
    #[error("Transport error: {0}")]
    Transport(String),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Text shown to the user in an error alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No token stored")]
    Missing,

    #[error("Token could not be decoded: {0}")]
    Undecodable(String),
}

impl From<jsonwebtoken::errors::Error> for CredentialError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Undecodable(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache storage error: {0}")]
    Storage(String),
}
