use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::configuration::{ConfigurationError, Settings};
use crate::model::{
    DetailedPost, LoginResponse, NewPost, PostUpdate, PostsResponse, ValidationError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("invalid query filter: {0}")]
    InvalidFilter(&'static str),
    #[error("authentication failed with status {status}: {body}")]
    AuthenticationFailed { status: StatusCode, body: String },
    #[error("post {id} not found")]
    NotFound { id: u64 },
    #[error("unexpected response from server: {status}: {body}")]
    UnexpectedResponse { status: StatusCode, body: String },
}

/// OneFootball Network endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum Endpoint {
    #[strum(serialize = "/v1/login")]
    Login,
    #[strum(serialize = "/v1/posts")]
    Posts,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

/// Client for the OneFootball Network publishing API.
///
/// Construction authenticates against the login endpoint and stores the
/// returned session token; a value of this type is therefore always
/// authenticated, and the token is attached to every request for the
/// lifetime of the instance. The client never re-authenticates; when the
/// token expires, create a new client.
///
/// All operations are blocking; each issues exactly one HTTP request and
/// surfaces any non-success outcome as an [`ApiError`] without retrying.
pub struct OneFootballNetwork {
    settings: Settings,
    http: Client,
    access_token: String,
}

impl OneFootballNetwork {
    /// Authenticate against the network with the given settings.
    pub fn new(settings: Settings) -> Result<OneFootballNetwork, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let access_token = authenticate(&http, &settings)?;
        Ok(OneFootballNetwork {
            settings,
            http,
            access_token,
        })
    }

    /// Resolve [`Settings`] from the environment and authenticate.
    pub fn from_env() -> Result<OneFootballNetwork, ApiError> {
        OneFootballNetwork::new(Settings::from_env()?)
    }

    /// The session token obtained at construction.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// List posts created by this account, filtered by exactly one of
    /// `external_id` or `feed_item_id`.
    ///
    /// Two posts in different languages can share an external ID, so the
    /// external-ID filter may legitimately return more than one post.
    /// `feed_item_id` may be a comma-joined list of feed item IDs, which the
    /// remote API looks up as a batch.
    pub fn list_articles(
        &self,
        external_id: Option<&str>,
        feed_item_id: Option<&str>,
    ) -> Result<PostsResponse, ApiError> {
        let (name, value) = match (external_id, feed_item_id) {
            (None, None) => {
                return Err(ApiError::InvalidFilter(
                    "a query filter must always be provided",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ApiError::InvalidFilter(
                    "combining query filters is not allowed",
                ))
            }
            (Some(external_id), None) => ("external_id", external_id),
            (None, Some(feed_item_id)) => ("feed_item_id", feed_item_id),
        };

        debug!("listing posts with {}={}", name, value);
        let response = self
            .http
            .get(self.url(Endpoint::Posts))
            .query(&[(name, value)])
            .header("Authorization", self.bearer())
            .send()?;
        read_json(response)
    }

    /// Fetch a single post by its remote-assigned id.
    pub fn get_article(&self, id: u64) -> Result<DetailedPost, ApiError> {
        debug!("fetching post {}", id);
        let response = self
            .http
            .get(self.post_url(id))
            .header("Authorization", self.bearer())
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { id });
        }
        read_json(response)
    }

    /// Create a single post.
    ///
    /// The remote system processes new posts asynchronously, so the returned
    /// post may still have `synced == false`; callers needing confirmation
    /// poll [`get_article`](Self::get_article) or
    /// [`list_articles`](Self::list_articles) themselves.
    pub fn publish_article(&self, article: &NewPost) -> Result<DetailedPost, ApiError> {
        debug!(
            "publishing {} post with external ID {}",
            article.language(),
            article.external_id()
        );
        let response = self
            .http
            .post(self.url(Endpoint::Posts))
            .header("Authorization", self.bearer())
            .json(article)
            .send()?;
        read_json(response)
    }

    /// Update an existing post. Only the fields set on `update` are sent;
    /// the remote keeps its prior values for the rest.
    pub fn update_article(&self, id: u64, update: &PostUpdate) -> Result<DetailedPost, ApiError> {
        debug!("updating post {}", id);
        let response = self
            .http
            .put(self.post_url(id))
            .header("Authorization", self.bearer())
            .json(update)
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { id });
        }
        read_json(response)
    }

    /// Delete a post. Returns `true` only when the remote confirms the
    /// deletion with 204 No Content; any other success status yields
    /// `false`.
    pub fn delete_article(&self, id: u64) -> Result<bool, ApiError> {
        debug!("deleting post {}", id);
        let response = self
            .http
            .delete(self.post_url(id))
            .header("Authorization", self.bearer())
            .send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { id });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::UnexpectedResponse { status, body });
        }
        Ok(status == StatusCode::NO_CONTENT)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        endpoint_url(&self.settings, endpoint)
    }

    fn post_url(&self, id: u64) -> String {
        format!("{}/{}", self.url(Endpoint::Posts), id)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

fn endpoint_url(settings: &Settings, endpoint: Endpoint) -> String {
    format!(
        "{}{}",
        settings.base_url().as_str().trim_end_matches('/'),
        endpoint
    )
}

fn authenticate(http: &Client, settings: &Settings) -> Result<String, ApiError> {
    info!("retrieving an authentication token from {}", settings.base_url());
    let response = http
        .post(endpoint_url(settings, Endpoint::Login))
        .json(&LoginRequest {
            login: settings.login(),
            password: settings.password(),
        })
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ApiError::AuthenticationFailed { status, body });
    }

    let login: LoginResponse = serde_json::from_str(&response.text()?)?;
    if login.access_token.is_empty() {
        return Err(ApiError::AuthenticationFailed {
            status,
            body: "login response carried an empty access token".to_string(),
        });
    }
    debug!("authentication successful");
    Ok(login.access_token)
}

fn read_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ApiError::UnexpectedResponse { status, body });
    }
    let body = response.text()?;
    trace!("raw response body: {}", body);
    Ok(serde_json::from_str(&body)?)
}
