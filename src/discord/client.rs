use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;

use super::{DiscordUser, IdentityService, IdentitySession, LookupError};
use crate::config::Credential;

const MAX_RATE_LIMIT_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!(
    "DiscordBot (discord-resolver, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

#[derive(Debug, Clone)]
pub struct DiscordClient {
    api_base: String,
}

impl DiscordClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityService for DiscordClient {
    async fn connect(
        &self,
        token: &Credential,
    ) -> Result<Box<dyn IdentitySession>, LookupError> {
        let session = DiscordSession::open(&self.api_base, token)?;
        let me = session.login().await?;
        tracing::debug!("Authenticated as {}", me.username);
        Ok(Box::new(session))
    }
}

/// 单次查询使用的 HTTP 会话，不在查询之间复用
pub struct DiscordSession {
    http: Client,
    api_base: String,
    authorization: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

impl DiscordSession {
    pub fn open(api_base: &str, token: &Credential) -> Result<Self, LookupError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: api_base.to_string(),
            authorization: format!("Bot {}", token.expose()),
        })
    }

    /// 用 `GET /users/@me` 校验令牌
    pub async fn login(&self) -> Result<DiscordUser, LookupError> {
        let response = self.get("/users/@me").await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(LookupError::Unauthorized),
            status => Err(api_error(status, response).await),
        }
    }

    async fn get(&self, path: &str) -> Result<Response, LookupError> {
        let url = format!("{}{}", self.api_base, path);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = self
                .http
                .get(&url)
                .header(header::AUTHORIZATION, &self.authorization)
                .send()
                .await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
            if attempt >= MAX_RATE_LIMIT_ATTEMPTS {
                return Err(LookupError::RateLimited(attempt));
            }

            // 等待时间超过上限或无法解析时直接放弃
            let Some(wait) = retry_after(response).await else {
                tracing::warn!("Rate limited on {} with an unusable retry_after", path);
                return Err(LookupError::RateLimited(attempt));
            };
            tracing::warn!("Rate limited on {}, retrying in {:?}", path, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[async_trait]
impl IdentitySession for DiscordSession {
    async fn fetch_user(&self, user_id: u64) -> Result<DiscordUser, LookupError> {
        let response = self.get(&format!("/users/{}", user_id)).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            StatusCode::UNAUTHORIZED => Err(LookupError::Unauthorized),
            status => Err(api_error(status, response).await),
        }
    }
}

impl Drop for DiscordSession {
    fn drop(&mut self) {
        tracing::trace!("Discord session closed");
    }
}

// 优先读 Retry-After 头，其次读响应体里的 retry_after（秒）
async fn retry_after(response: Response) -> Option<Duration> {
    let from_header = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok());

    let seconds = match from_header {
        Some(seconds) => seconds,
        None => response
            .json::<RateLimitBody>()
            .await
            .map(|body| body.retry_after)
            .unwrap_or(1.0),
    };

    if seconds.is_nan() {
        return None;
    }
    if seconds <= 0.0 {
        return Some(Duration::ZERO);
    }
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|wait| *wait <= MAX_RETRY_AFTER)
}

async fn api_error(status: StatusCode, response: Response) -> LookupError {
    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    LookupError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_login(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .and(header("authorization", "Bot test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "1", "username": "resolver-bot"})),
            )
            .mount(server)
            .await;
    }

    fn token() -> Credential {
        Credential::new("test-token")
    }

    #[tokio::test]
    async fn fetches_user_after_login() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/80351110224678912"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "80351110224678912",
                "username": "nelly",
                "global_name": "Nelly",
                "avatar": "8342729096ea3675442027381ff50dfe",
                "discriminator": "0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordClient::new(server.uri());
        let session = client.connect(&token()).await.unwrap();
        let user = session.fetch_user(80351110224678912).await.unwrap();

        assert_eq!(user.username, "nelly");
        assert_eq!(user.global_name.as_deref(), Some("Nelly"));
    }

    #[tokio::test]
    async fn unknown_user_maps_to_not_found() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/42"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"message": "Unknown User", "code": 10013})),
            )
            .mount(&server)
            .await;

        let session = DiscordClient::new(server.uri())
            .connect(&token())
            .await
            .unwrap();
        let result = session.fetch_user(42).await;

        assert!(matches!(result, Err(LookupError::NotFound)));
    }

    #[tokio::test]
    async fn rejected_token_fails_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "401: Unauthorized", "code": 0})),
            )
            .mount(&server)
            .await;

        let result = DiscordClient::new(server.uri()).connect(&token()).await;

        assert!(matches!(result, Err(LookupError::Unauthorized)));
    }

    #[tokio::test]
    async fn server_error_keeps_message() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .mount(&server)
            .await;

        let session = DiscordClient::new(server.uri())
            .connect(&token())
            .await
            .unwrap();

        match session.fetch_user(7).await {
            Err(LookupError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn waits_out_rate_limit_then_succeeds() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/9"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"message": "You are being rate limited.", "retry_after": 0.01, "global": false})),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9", "username": "nine"})))
            .with_priority(2)
            .mount(&server)
            .await;

        let session = DiscordClient::new(server.uri())
            .connect(&token())
            .await
            .unwrap();
        let user = session.fetch_user(9).await.unwrap();

        assert_eq!(user.username, "nine");
    }

    #[tokio::test]
    async fn gives_up_after_repeated_rate_limits() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/9"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .expect(u64::from(MAX_RATE_LIMIT_ATTEMPTS))
            .mount(&server)
            .await;

        let session = DiscordClient::new(server.uri())
            .connect(&token())
            .await
            .unwrap();
        let result = session.fetch_user(9).await;

        assert!(matches!(result, Err(LookupError::RateLimited(3))));
    }

    #[tokio::test]
    async fn oversized_retry_after_gives_up_without_waiting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1e30"))
            .expect(1)
            .mount(&server)
            .await;

        let result = DiscordClient::new(server.uri()).connect(&token()).await;

        assert!(matches!(result, Err(LookupError::RateLimited(1))));
    }

    #[tokio::test]
    async fn oversized_body_retry_after_gives_up() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/5"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"retry_after": 1.0e300})),
            )
            .mount(&server)
            .await;

        let session = DiscordClient::new(server.uri())
            .connect(&token())
            .await
            .unwrap();
        let result = session.fetch_user(5).await;

        assert!(matches!(result, Err(LookupError::RateLimited(1))));
    }
}
