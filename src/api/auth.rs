use crate::api::client::{join_segments, json_client};
use crate::api::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile};
use crate::error::{ApiError, AuthError};
use crate::forms::{LoginForm, RegisterForm};
use crate::session::{Route, Session, post_login_route};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";

const INVALID_CREDENTIALS: &str = "Credenciais inválidas. Verifique seu email e senha.";
const EMAIL_TAKEN: &str = "Este email já está cadastrado. Tente fazer login.";
const REGISTER_FAILED: &str = "Erro ao realizar cadastro. Por favor, tente novamente.";

/// Login and registration. These endpoints answer business errors in a JSON
/// body, so a non-2xx here never expires the session.
#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
    base: Url,
    session: Session,
}

impl AuthService {
    pub fn new(base: Url, session: Session) -> Result<Self, ApiError> {
        Ok(Self { http: json_client()?, base, session })
    }

    /// A 2xx reply must parse. A non-2xx reply with a JSON body is a business
    /// answer for the caller to read; anything else is a server failure.
    async fn post<B, T>(&self, path: [&str; 2], body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = join_segments(&self.base, path)?;
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        log::debug!("{} {} -> HTTP {status}", path[0], path[1]);
        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }
        serde_json::from_str(&text).map_err(|_| {
            log::error!("{} {} failed with HTTP {status}: {text}", path[0], path[1]);
            ApiError::Backend { status: status.as_u16(), payload: Value::Null }
        })
    }

    /// Validates, exchanges credentials for a token, persists it and navigates
    /// to `from` (if it was a protected view) or the dashboard.
    pub async fn login(&self, form: &LoginForm, from: Option<&str>) -> Result<Route, AuthError> {
        form.validate()?;
        let request = LoginRequest { email: form.email.trim(), password: &form.password };
        let reply: LoginResponse = self.post(["auth", "login"], &request).await?;
        match reply.access_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session.login(&token)?;
                let route = post_login_route(from);
                log::info!("logged in as {}", request.email);
                self.session.navigate(route.clone());
                Ok(route)
            }
            None => Err(AuthError::Rejected(
                reply.error.or(reply.message).unwrap_or_else(|| INVALID_CREDENTIALS.into()),
            )),
        }
    }

    /// Creates the account and sends the user to the login view.
    pub async fn register(&self, form: &RegisterForm) -> Result<UserProfile, AuthError> {
        form.validate()?;
        let request = RegisterRequest {
            name: form.name.trim(),
            email: form.email.trim(),
            password: &form.password,
        };
        let reply: RegisterResponse = self.post(["auth", "register"], &request).await?;
        if let Some(user) = reply.user {
            log::info!("registered {}", user.email);
            self.session.navigate(Route::login());
            return Ok(user);
        }
        let message = match reply.error.as_deref() {
            Some(EMAIL_EXISTS) => EMAIL_TAKEN.to_string(),
            _ => reply.message.or(reply.error).unwrap_or_else(|| REGISTER_FAILED.into()),
        };
        Err(AuthError::Rejected(message))
    }
}
