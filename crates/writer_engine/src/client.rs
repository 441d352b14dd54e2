use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use writer_core::{AccessToken, Clock, DraftArticle, DraftHandle, SystemClock, TokenCache};
use writer_logging::{writer_debug, writer_info, writer_warn};

use crate::error::{Operation, PublishError};
use crate::media::{guess_image_mime, id_field, AssetKind, MediaAsset, PublishResult, PublishStatus};

pub const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7_200);

/// Longest `expires_in` taken at face value; anything above falls back to
/// [`DEFAULT_TOKEN_TTL`].
const MAX_TOKEN_TTL: Duration = Duration::from_secs(86_400);

#[derive(Debug, Clone)]
pub struct WeChatSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Pause between a successful publish and the single status query.
    pub status_delay: Duration,
}

impl Default for WeChatSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            status_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    /// Both values must be present and non-blank.
    pub fn new(app_id: Option<String>, app_secret: Option<String>) -> Result<Self, PublishError> {
        let app_id = app_id.filter(|v| !v.trim().is_empty());
        let app_secret = app_secret.filter(|v| !v.trim().is_empty());
        match (app_id, app_secret) {
            (Some(app_id), Some(app_secret)) => Ok(Self { app_id, app_secret }),
            _ => Err(PublishError::MissingCredentials),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Client for the Official Account publishing API.
///
/// Holds the access token for the lifetime of one run. Every operation goes
/// through [`WeChatClient::acquire_token`], so the token is fetched lazily and
/// refreshed once it is within the safety margin of expiring.
pub struct WeChatClient {
    credentials: Credentials,
    settings: WeChatSettings,
    http: reqwest::Client,
    clock: Arc<dyn Clock>,
    tokens: TokenCache,
}

impl WeChatClient {
    pub fn new(credentials: Credentials, settings: WeChatSettings) -> Result<Self, PublishError> {
        Self::with_clock(credentials, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        credentials: Credentials,
        settings: WeChatSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| PublishError::transport(Operation::TokenExchange, err))?;
        Ok(Self {
            credentials,
            settings,
            http,
            clock,
            tokens: TokenCache::new(),
        })
    }

    pub fn settings(&self) -> &WeChatSettings {
        &self.settings
    }

    /// Preload a token, e.g. one carried over from an earlier run.
    pub fn seed_token(&mut self, token: AccessToken) {
        self.tokens.store(token);
    }

    pub fn cached_token(&self) -> Option<&AccessToken> {
        self.tokens.current()
    }

    /// Returns the cached token while usable, otherwise exchanges the
    /// credentials for a new one.
    pub async fn acquire_token(&mut self) -> Result<String, PublishError> {
        let now = self.clock.now();
        if let Some(token) = self.tokens.usable(now) {
            writer_debug!("Reusing cached access token");
            return Ok(token.to_string());
        }

        writer_info!("Getting access token...");
        let response = self
            .http
            .get(self.endpoint("/cgi-bin/token"))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.credentials.app_id.as_str()),
                ("secret", self.credentials.app_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|err| PublishError::transport(Operation::TokenExchange, err))?;
        let body = read_json(Operation::TokenExchange, response).await?;

        let Some(value) = body.get("access_token").and_then(Value::as_str) else {
            return Err(PublishError::Authentication { response: body });
        };
        let ttl = match body.get("expires_in").and_then(Value::as_u64).map(Duration::from_secs) {
            Some(ttl) if ttl <= MAX_TOKEN_TTL => ttl,
            Some(ttl) => {
                writer_warn!(
                    "Ignoring implausible token lifetime of {}s, assuming {}s",
                    ttl.as_secs(),
                    DEFAULT_TOKEN_TTL.as_secs()
                );
                DEFAULT_TOKEN_TTL
            }
            None => DEFAULT_TOKEN_TTL,
        };

        let token = AccessToken::issued(value, now, ttl);
        writer_info!("Access token obtained (valid for {}s)", ttl.as_secs());
        Ok(self.tokens.store(token).to_string())
    }

    /// Uploads a local image.
    ///
    /// A cover failure is returned as an error. A content image failure past
    /// the token step degrades to [`MediaAsset::LocalFallback`].
    pub async fn upload_asset(
        &mut self,
        local_path: &Path,
        kind: AssetKind,
    ) -> Result<MediaAsset, PublishError> {
        let bytes = std::fs::read(local_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PublishError::FileNotFound(local_path.to_path_buf())
            } else {
                PublishError::Io {
                    path: local_path.to_path_buf(),
                    source,
                }
            }
        })?;
        let token = self.acquire_token().await?;

        match kind {
            AssetKind::Cover => {
                writer_info!("Uploading cover image: {}", local_path.display());
                let body = self
                    .post_media(
                        Operation::CoverUpload,
                        "/cgi-bin/material/add_material",
                        &[("access_token", token.as_str()), ("type", "thumb")],
                        local_path,
                        bytes,
                    )
                    .await?;
                match body.get("media_id").and_then(Value::as_str) {
                    Some(media_id) => {
                        writer_info!("Cover uploaded: {}", media_id);
                        Ok(MediaAsset::Cover {
                            media_id: media_id.to_string(),
                        })
                    }
                    None => Err(PublishError::Remote {
                        operation: Operation::CoverUpload,
                        response: body,
                    }),
                }
            }
            AssetKind::InlineContent => {
                writer_info!("Uploading article image: {}", local_path.display());
                let outcome = self
                    .post_media(
                        Operation::ContentImageUpload,
                        "/cgi-bin/media/uploadimg",
                        &[("access_token", token.as_str())],
                        local_path,
                        bytes,
                    )
                    .await;
                let url = match &outcome {
                    Ok(body) => body.get("url").and_then(Value::as_str),
                    Err(_) => None,
                };
                match url {
                    Some(url) => {
                        writer_info!("Article image uploaded: {}", url);
                        Ok(MediaAsset::ContentImage {
                            url: url.to_string(),
                        })
                    }
                    None => {
                        match &outcome {
                            Ok(body) => writer_warn!(
                                "Failed to upload article image {}: {}",
                                local_path.display(),
                                body
                            ),
                            Err(err) => writer_warn!(
                                "Failed to upload article image {}: {}",
                                local_path.display(),
                                err
                            ),
                        }
                        Ok(MediaAsset::LocalFallback {
                            path: local_path.to_path_buf(),
                        })
                    }
                }
            }
        }
    }

    pub async fn create_draft(&mut self, draft: &DraftArticle) -> Result<DraftHandle, PublishError> {
        let token = self.acquire_token().await?;
        writer_info!("Creating draft...");
        let body = self
            .post_json(
                Operation::DraftCreation,
                "/cgi-bin/draft/add",
                &token,
                draft.to_request_body()?,
            )
            .await?;
        match body.get("media_id").and_then(Value::as_str) {
            Some(media_id) => {
                writer_info!("Draft created: {}", media_id);
                Ok(DraftHandle(media_id.to_string()))
            }
            None => Err(PublishError::Remote {
                operation: Operation::DraftCreation,
                response: body,
            }),
        }
    }

    /// Submits a draft for publication.
    ///
    /// Failure is signalled by a non-zero `errcode` in the body, which may come
    /// with HTTP 200, so the body is always checked.
    pub async fn publish(&mut self, draft: &DraftHandle) -> Result<PublishResult, PublishError> {
        let token = self.acquire_token().await?;
        writer_info!("Publishing draft {}...", draft);
        let payload = serde_json::to_vec(&json!({ "media_id": draft.as_str() }))?;
        let body = self
            .post_json(Operation::Publish, "/cgi-bin/freepublish/submit", &token, payload)
            .await?;

        let errcode = body.get("errcode").and_then(Value::as_i64).unwrap_or(0);
        if errcode != 0 {
            let errmsg = body
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(PublishError::Api {
                operation: Operation::Publish,
                errcode,
                errmsg,
            });
        }

        let result = PublishResult {
            publish_id: id_field(&body, "publish_id"),
            msg_data_id: id_field(&body, "msg_data_id"),
            raw: body,
        };
        writer_info!(
            "Article published, publish id: {}",
            result.publish_id.as_deref().unwrap_or("<none>")
        );
        writer_warn!(
            "The article is visible in the account history but no push notification was sent"
        );
        Ok(result)
    }

    pub async fn get_publish_status(&mut self, publish_id: &str) -> Result<PublishStatus, PublishError> {
        let token = self.acquire_token().await?;
        let payload = serde_json::to_vec(&json!({ "publish_id": publish_id }))?;
        let raw = self
            .post_json(Operation::StatusQuery, "/cgi-bin/freepublish/get", &token, payload)
            .await?;
        Ok(PublishStatus { raw })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn post_json(
        &self,
        operation: Operation,
        path: &str,
        token: &str,
        payload: Vec<u8>,
    ) -> Result<Value, PublishError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .query(&[("access_token", token)])
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(payload)
            .send()
            .await
            .map_err(|err| PublishError::transport(operation, err))?;
        read_json(operation, response).await
    }

    async fn post_media(
        &self,
        operation: Operation,
        path: &str,
        query: &[(&str, &str)],
        local_path: &Path,
        bytes: Vec<u8>,
    ) -> Result<Value, PublishError> {
        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(guess_image_mime(local_path))
            .map_err(|err| PublishError::transport(operation, err))?;
        let form = Form::new().part("media", part);

        let response = self
            .http
            .post(self.endpoint(path))
            .query(query)
            .multipart(form)
            .send()
            .await
            .map_err(|err| PublishError::transport(operation, err))?;
        read_json(operation, response).await
    }
}

/// The API reports errors in the body, so the HTTP status is only logged.
async fn read_json(operation: Operation, response: reqwest::Response) -> Result<Value, PublishError> {
    let status = response.status();
    if !status.is_success() {
        writer_warn!("{} returned HTTP {}", operation, status);
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| PublishError::transport(operation, err))?;
    serde_json::from_slice(&bytes).map_err(|err| PublishError::Decode {
        operation,
        message: err.to_string(),
    })
}
