use serde_json::Value;
use thiserror::Error;

const NETWORK_MESSAGE: &str =
    "Erro ao conectar ao servidor. Por favor, tente novamente mais tarde.";

/// Failures of the message/status endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been expired and the
    /// shell sent back to the login view by the time the caller sees this.
    #[error("unauthorized: session is missing or no longer valid")]
    Unauthorized,
    #[error("backend returned HTTP {status}: {payload}")]
    Backend { status: u16, payload: Value },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message from the backend payload, if it carries one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend { payload, .. } => backend_message(payload),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Sua sessão expirou. Faça login novamente.".into(),
            ApiError::Backend { status, .. } => self
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("O servidor respondeu com erro (HTTP {status}).")),
            ApiError::Decode(_) => "O servidor enviou uma resposta inesperada.".into(),
            ApiError::Network(_) | ApiError::Url(_) => NETWORK_MESSAGE.into(),
        }
    }
}

pub(crate) fn backend_message(payload: &Value) -> Option<&str> {
    match payload {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// Client-side form checks. The display text is what the form shows inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, informe seu nome completo")]
    MissingName,
    #[error("Por favor, informe seu email")]
    MissingEmail,
    #[error("Por favor, informe um email válido")]
    InvalidEmail,
    #[error("Por favor, informe sua senha")]
    MissingPassword,
    #[error("A senha deve ter pelo menos 8 caracteres")]
    PasswordTooShort,
    #[error("As senhas não coincidem")]
    PasswordMismatch,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backend refused the request with a business error.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to persist credentials: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(e) => e.to_string(),
            AuthError::Rejected(msg) => msg.clone(),
            AuthError::Api(e) => e.user_message(),
            AuthError::Storage(_) => "Não foi possível salvar a sessão neste computador.".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
