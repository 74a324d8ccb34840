use crate::api::models::{
    AllMessagesPayload, Conversation, Overview, SystemStateRequest, SystemStatus,
};
use crate::error::ApiError;
use crate::session::Session;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

pub(crate) fn json_client() -> Result<HttpClient, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    HttpClient::builder().default_headers(headers).build()
}

/// Append path segments to `base`, keeping whatever path `base` already has.
pub(crate) fn join_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Parse a body that may legitimately be empty (acks).
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Client for the message and service-status endpoints.
///
/// The bearer token is read from the session on every request, so logging in
/// again never leaves a stale credential behind.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base: Url,
    prefix: Vec<String>,
    session: Session,
}

impl ApiClient {
    pub fn new(base: Url, api_prefix: &str, session: Session) -> Result<Self, ApiError> {
        Ok(Self::with_http(json_client()?, base, api_prefix, session))
    }

    pub fn with_http(http: HttpClient, base: Url, api_prefix: &str, session: Session) -> Self {
        let prefix = api_prefix
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { http, base, prefix, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let prefix = self.prefix.iter().map(String::as_str);
        join_segments(&self.base, prefix.chain(segments.iter().copied()))
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => {
                log::warn!("no credential token stored, sending request without it");
                req
            }
        }
    }

    /// Single attempt. 401 expires the session before the error reaches the caller.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.with_auth(req).send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let text = resp.text().await?;
            let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ApiError::Backend { status: status.as_u16(), payload });
        }
        read_json(resp).await
    }

    /// Conversations together with the dashboard counters.
    pub async fn overview(&self) -> Result<Overview, ApiError> {
        let url = self.endpoint(&["getAllMessages"])?;
        self.send::<AllMessagesPayload>(self.http.get(url))
            .await
            .map(Overview::from)
            .inspect_err(|e| log::error!("error fetching all messages: {e}"))
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        Ok(self.overview().await?.conversations)
    }

    pub async fn conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        let url = self.endpoint(&["getMessage", id])?;
        self.send(self.http.post(url))
            .await
            .inspect_err(|e| log::error!("error fetching conversation {id}: {e}"))
    }

    pub async fn service_status(&self) -> Result<SystemStatus, ApiError> {
        let url = self.endpoint(&["systemStatus"])?;
        self.send(self.http.get(url))
            .await
            .inspect_err(|e| log::error!("error fetching system status: {e}"))
    }

    /// Returns the backend's acknowledgement as-is.
    pub async fn set_service_status(&self, active: bool) -> Result<Value, ApiError> {
        let url = self.endpoint(&["system"])?;
        let body = SystemStateRequest { state: active };
        self.send(self.http.post(url).json(&body))
            .await
            .inspect(|_| log::info!("service status set to active={active}"))
            .inspect_err(|e| log::error!("error updating service status: {e}"))
    }

    pub async fn mark_reviewed(&self, id: &str) -> Result<Conversation, ApiError> {
        let url = self.endpoint(&["markAsReviewed", id])?;
        self.send(self.http.patch(url))
            .await
            .inspect_err(|e| log::error!("error marking conversation {id} as reviewed: {e}"))
    }
}
