use std::{env, time::Duration};

use moka::future::Cache;
use serde::Deserialize;

use crate::error::{Error, Result};

const TOKEN_CACHE_KEY: &str = "client_credentials";
// Refresh a little before the provider's own expiry.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub client_id: String,
    pub client_secret: String,
    pub accounts_url: String,
    pub api_url: String,
}

impl ChartConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("CHART_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("CHART_CLIENT_SECRET").unwrap_or_default(),
            accounts_url: env::var("CHART_ACCOUNTS_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com".to_string()),
            api_url: env::var("CHART_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    ttl: Duration,
}

/// Each cached token expires with the lifetime the provider granted it.
struct TokenExpiry;

impl moka::Expiry<&'static str, CachedToken> for TokenExpiry {
    fn expire_after_create(
        &self,
        _key: &&'static str,
        value: &CachedToken,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Read-only proxy to the chart provider's playlist API.
#[derive(Clone)]
pub struct ChartService {
    client: reqwest::Client,
    config: ChartConfig,
    tokens: Cache<&'static str, CachedToken>,
}

impl ChartService {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            tokens: Cache::builder()
                .max_capacity(1)
                .expire_after(TokenExpiry)
                .build(),
        }
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let res = self
            .client
            .post(format!("{}/api/token", self.config.accounts_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::ChartProviderError(format!(
                "Token request failed with status {}",
                res.status()
            )));
        }

        let token: AccessTokenResponse = res.json().await?;
        let ttl = token
            .expires_in
            .unwrap_or(3600)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        Ok(CachedToken {
            token: token.access_token,
            ttl: Duration::from_secs(ttl),
        })
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(cached) = self.tokens.get(&TOKEN_CACHE_KEY).await {
            return Ok(cached.token);
        }

        let fresh = self.request_token().await?;
        tracing::debug!(
            "Fetched chart provider token, valid for {}s",
            fresh.ttl.as_secs()
        );
        if !fresh.ttl.is_zero() {
            self.tokens.insert(TOKEN_CACHE_KEY, fresh.clone()).await;
        }
        Ok(fresh.token)
    }

    pub async fn get_playlist(&self, playlist_id: &str) -> Result<serde_json::Value> {
        if playlist_id.trim().is_empty() || playlist_id.contains('/') {
            return Err(Error::InvalidInput {
                reason: "Invalid playlist id".to_string(),
            });
        }

        let token = self.access_token().await?;

        let res = self
            .client
            .get(format!("{}/playlists/{}", self.config.api_url, playlist_id))
            .bearer_auth(token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::ChartProviderError(format!(
                "Playlist request failed with status {}",
                res.status()
            )));
        }

        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Stand-in provider on a random local port. Returns its base URL and the
    /// number of token requests it served.
    async fn fake_provider() -> (String, Arc<AtomicUsize>) {
        let token_calls = Arc::new(AtomicUsize::new(0));
        let counter = token_calls.clone();

        let app = Router::new()
            .route(
                "/api/token",
                post(move |headers: HeaderMap| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let authorized = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .is_some_and(|v| v.starts_with("Basic "));
                        if !authorized {
                            return Err(StatusCode::UNAUTHORIZED);
                        }
                        Ok(Json(serde_json::json!({
                            "access_token": "tok-1",
                            "token_type": "Bearer",
                            "expires_in": 3600
                        })))
                    }
                }),
            )
            .route(
                "/v1/playlists/{id}",
                get(|Path(id): Path<String>, headers: HeaderMap| async move {
                    let bearer = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if bearer != "Bearer tok-1" {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    if id == "missing" {
                        return Err(StatusCode::NOT_FOUND);
                    }
                    Ok(Json(serde_json::json!({ "id": id, "name": "Top 50" })))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), token_calls)
    }

    fn service(base: &str) -> ChartService {
        ChartService::new(ChartConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            accounts_url: base.to_string(),
            api_url: format!("{base}/v1"),
        })
    }

    #[tokio::test]
    async fn test_playlist_is_proxied_and_token_reused() {
        let (base, token_calls) = fake_provider().await;
        let service = service(&base);

        let first = service.get_playlist("37i9dQZEVXbMDoHDwVN2tF").await.unwrap();
        assert_eq!(first["id"], "37i9dQZEVXbMDoHDwVN2tF");
        assert_eq!(first["name"], "Top 50");

        service.get_playlist("other").await.unwrap();
        assert_eq!(token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_upstream_failure() {
        let (base, _) = fake_provider().await;
        let result = service(&base).get_playlist("missing").await;
        assert!(matches!(result, Err(Error::ChartProviderError(_))));
    }

    #[tokio::test]
    async fn test_invalid_playlist_id() {
        let service = service("http://127.0.0.1:9");
        let result = service.get_playlist("a/b").await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }
}
