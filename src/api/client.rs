/// Gallery API client
///
/// All requests carry the configured session cookie and whatever cookies
/// the server sets on the way. A 401 on any route ends the session: the
/// login page is opened once and the caller gets `None`.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ServerConfig;
use crate::error::{AdminError, Result};
use crate::state::data::{CountReply, ErrorBody, FileRecord, Stats};
use crate::state::export::ExportRequest;
use crate::state::session::SessionGuard;

const USER_AGENT: &str = concat!("gallery-admin/", env!("CARGO_PKG_VERSION"));

/// Called with the login URL by the request that first sees a 401.
pub type LoginRedirect = Arc<dyn Fn(&Url) + Send + Sync>;

/// Request body.
pub enum Payload {
    Empty,
    Json(String),
    Multipart(reqwest::multipart::Form),
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    login: Url,
    session: SessionGuard,
    redirect: LoginRedirect,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("expired", &self.session.is_expired())
            .finish()
    }
}

impl ApiClient {
    /// Client that opens the login page in the system browser.
    pub fn new(config: &ServerConfig, session: SessionGuard) -> Result<Self> {
        Self::with_redirect(config, session, Arc::new(open_in_browser))
    }

    pub fn with_redirect(
        config: &ServerConfig,
        session: SessionGuard,
        redirect: LoginRedirect,
    ) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| AdminError::Config(format!("invalid base_url {:?}: {e}", config.base_url)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let login = base
            .join(config.login_path.trim_start_matches('/'))
            .map_err(|e| AdminError::Config(format!("invalid login_path: {e}")))?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| AdminError::Config(format!("invalid session_cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AdminError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            login,
            session,
            redirect,
        })
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub fn login_url(&self) -> &Url {
        &self.login
    }

    /// Absolute URL for a server-relative path (or an absolute URL as is).
    pub fn resolve(&self, path: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AdminError::Validation(format!("invalid URL {path:?}: {e}")))
    }

    /// Send a request with credentials.
    ///
    /// `Ok(None)` means the session expired; the redirect has been handled
    /// and the caller should stop without reporting anything. Other
    /// statuses are returned as they are.
    pub async fn request(&self, method: Method, path: &str, body: Payload) -> Result<Option<Response>> {
        if self.session.is_expired() {
            return Ok(None);
        }

        let url = self.resolve(path)?;
        tracing::debug!(%method, %url, "request");

        let builder = self.http.request(method, url);
        let builder = match body {
            Payload::Empty => builder,
            Payload::Json(json) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json),
            Payload::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.expire();
            return Ok(None);
        }
        Ok(Some(response))
    }

    /// Record the expiry and redirect if nobody did yet.
    pub fn expire(&self) {
        if self.session.expire() {
            tracing::warn!(login = %self.login, "session expired, redirecting to login");
            (self.redirect)(&self.login);
        }
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let response = self.request(Method::GET, path, Payload::Empty).await?;
        check(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// HTML of the host page, carrying the capability attributes.
    pub async fn host_page(&self) -> Result<String> {
        Ok(self.get("/").await?.text().await?)
    }

    pub async fn session_check(&self) -> Result<()> {
        self.get("/api/session-check").await.map(|_| ())
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.get_json("/api/stats").await
    }

    pub async fn albums(&self) -> Result<Vec<String>> {
        self.get_json("/api/albums").await
    }

    pub async fn articles(&self, album: &str) -> Result<Vec<String>> {
        self.get_json(&format!("/api/articles/{}", segment(album))).await
    }

    pub async fn count_album(&self, album: &str) -> Result<u64> {
        let reply: CountReply = self
            .get_json(&format!("/api/count/album/{}", segment(album)))
            .await?;
        Ok(reply.count)
    }

    pub async fn count_article(&self, album: &str, article: &str) -> Result<u64> {
        let reply: CountReply = self
            .get_json(&format!("/api/count/article/{}/{}", segment(album), segment(article)))
            .await?;
        Ok(reply.count)
    }

    /// File records of an album, or of one article in it.
    pub async fn thumbnails(&self, album: &str, article: Option<&str>) -> Result<Vec<FileRecord>> {
        let path = match article {
            Some(article) => format!("/api/thumbnails/{}/{}", segment(album), segment(article)),
            None => format!("/api/thumbnails/{}", segment(album)),
        };
        self.get_json(&path).await
    }

    pub async fn delete_album(&self, album: &str) -> Result<()> {
        self.delete(&format!("/api/delete-album/{}", segment(album))).await
    }

    pub async fn delete_article(&self, album: &str, article: &str) -> Result<()> {
        self.delete(&format!("/api/delete-article/{}/{}", segment(album), segment(article)))
            .await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path, Payload::Empty).await?;
        let response = check(response).await?;
        reject_error_body(response).await
    }

    /// Exported document bytes.
    pub async fn export(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let body = Payload::Json(request.to_json()?);
        let response = self.request(Method::POST, request.format.endpoint(), body).await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Raw bytes of a thumbnail or preview image.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }

    /// POST a multipart form and fail on an `{error}` reply.
    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> Result<()> {
        let response = self.request(Method::POST, path, Payload::Multipart(form)).await?;
        let response = check(response).await?;
        reject_error_body(response).await
    }
}

/// Percent-encoded path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `None` (401) becomes `AuthExpired`; non-2xx becomes `Server` with the
/// server's message when it sent one.
pub async fn check(response: Option<Response>) -> Result<Response> {
    let response = response.ok_or(AdminError::AuthExpired)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    tracing::warn!(status = status.as_u16(), %message, "server error");
    Err(AdminError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Some routes answer 200 with `{error}`.
async fn reject_error_body(response: Response) -> Result<()> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(());
    }
    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(ErrorBody { error: Some(message) }) => Err(AdminError::Server { status, message }),
        _ => Ok(()),
    }
}

fn open_in_browser(url: &Url) {
    if let Err(e) = open::that(url.as_str()) {
        tracing::error!(%url, "failed to open login page: {e}");
    }
}
