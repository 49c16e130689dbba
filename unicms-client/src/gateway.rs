use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use shared::{
    config::ClientConfig,
    models::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ClientError, ClientResult},
    policy::{ResponseDecision, ResponsePolicy, UnauthorizedPolicy},
    session::SessionStore,
    storage::StorageError,
};

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// HTTP gateway for every CMS backend call.
///
/// Identity headers are read from the session's durable storage right before
/// each request is sent, so a login or logout takes effect on the very next
/// call. Each response is handed to the [`ResponsePolicy`]; the default
/// policy clears the session on a 401 and never retries.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    session: Arc<SessionStore>,
    policy: Arc<dyn ResponsePolicy>,
}

impl ApiClient {
    /// Create a gateway for `config.api_base_url` sharing `session`.
    ///
    /// # Errors
    /// Returns [`ClientError::Build`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("unicms-client/", env!("CARGO_PKG_VERSION")));
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            session,
            policy: Arc::new(UnauthorizedPolicy),
        })
    }

    /// Replace the response policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl ResponsePolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Session record whose credentials this gateway sends.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn api_url(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|source| ClientError::InvalidPath {
            path: path.to_string(),
            source,
        })
    }

    fn apply_identity(&self, request: RequestBuilder) -> Result<RequestBuilder, StorageError> {
        let credentials = self.session.stored_credentials()?;
        let mut request = request;
        if let Some(token) = credentials.token {
            request = request.bearer_auth(token);
        }
        if let Some(user_id) = credentials.user_id {
            request = request.header(USER_ID_HEADER, user_id);
        }
        Ok(request)
    }

    async fn execute<F>(&self, build: F) -> ClientResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            let request = self.apply_identity(build())?;
            let response = request.send().await.map_err(|err| {
                warn!(error = %err, base_url = %self.base_url, "CMS backend unreachable");
                ClientError::Transport(err)
            })?;

            let status = response.status();
            debug!(%status, url = %response.url(), attempt, "CMS backend responded");

            match self.policy.decide(status, attempt) {
                ResponseDecision::Retry => {
                    attempt += 1;
                }
                ResponseDecision::ClearSession => {
                    warn!(%status, "credentials rejected; clearing session");
                    if let Err(err) = self.session.clear_auth() {
                        warn!(error = %err, "session cleared in memory only");
                    }
                    let body = read_body(response).await;
                    return Err(ClientError::Unauthorized {
                        status,
                        error: ErrorResponse::from_body(&body),
                    });
                }
                ResponseDecision::PassThrough if status.is_success() => return Ok(response),
                ResponseDecision::PassThrough => {
                    let body = read_body(response).await;
                    return Err(ClientError::Status {
                        status,
                        error: ErrorResponse::from_body(&body),
                        body,
                    });
                }
            }
        }
    }

    /// Send a request with an optional JSON body and return the raw response.
    ///
    /// # Errors
    /// See [`ClientError`]: transport failures, non-success statuses and
    /// rejected credentials are all surfaced to the caller.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.api_url(path)?;
        self.execute(|| {
            let request = self.client.request(method.clone(), url.clone());
            match body {
                Some(body) => request.json(body),
                None => request,
            }
        })
        .await
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    /// Propagates [`ApiClient::send`] errors and body decoding failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        response.json().await.map_err(ClientError::Decode)
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    /// Propagates [`ApiClient::send`] errors and body decoding failures.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        response.json().await.map_err(ClientError::Decode)
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    /// Propagates [`ApiClient::send`] errors and body decoding failures.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        response.json().await.map_err(ClientError::Decode)
    }

    /// `DELETE` a resource, discarding any response body.
    ///
    /// # Errors
    /// Propagates [`ApiClient::send`] errors.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Authenticate with email/password and populate the session record.
    ///
    /// # Errors
    /// Returns the gateway error on rejection; a storage failure after a
    /// successful login is returned as [`ClientError::Storage`].
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.post_json(LOGIN_PATH, &payload).await?;
        self.session.set_auth_from_response(&auth)?;
        Ok(auth)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    /// Same as [`ApiClient::login`].
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<AuthResponse> {
        let auth: AuthResponse = self.post_json(REGISTER_PATH, payload).await?;
        self.session.set_auth_from_response(&auth)?;
        Ok(auth)
    }

    /// Sign out locally. The backend keeps no session state to revoke.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the cleared record cannot be persisted.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.session.clear_auth()
    }
}

/// Body of an error response; a body that cannot be read is logged and
/// treated as empty so the status still reaches the caller.
async fn read_body(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!(%status, error = %err, "failed to read error response body");
            String::new()
        }
    }
}
