//! The API client: a pre-configured, auth-aware, cached, retrying HTTP
//! handle keyed by `source_id`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ac_domain::ids::sorted_json;
use ac_domain::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::RwLock;

use crate::types::{AuthScheme, Datasource, HttpMethod};

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

struct CacheEntry {
    response: ApiResponse,
    inserted_at: Instant,
}

pub struct ApiClient {
    http: reqwest::Client,
    cache: RwLock<HashMap<String, CacheEntry>>,
    cache_ttl: Duration,
    max_retries: u32,
}

impl ApiClient {
    pub fn new(cache_ttl_secs: u64, max_retries: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache: RwLock::new(HashMap::new()),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            max_retries,
        }
    }

    /// `source_id || method || path || sorted-json(params)`.
    fn cache_key(source_id: &str, method: HttpMethod, path: &str, params: &serde_json::Value) -> String {
        format!("{}|{}|{}|{}", source_id, method.as_str(), path, sorted_json(params))
    }

    fn auth_headers(&self, auth: &AuthScheme) -> Result<Vec<(String, String)>> {
        match auth {
            AuthScheme::None => Ok(Vec::new()),
            AuthScheme::ApiKey { header, env_var } => {
                let value = std::env::var(env_var)
                    .map_err(|_| Error::Config(format!("missing env var {env_var} for api-key auth")))?;
                Ok(vec![(header.clone(), value)])
            }
            AuthScheme::Bearer { env_var } => {
                let value = std::env::var(env_var)
                    .map_err(|_| Error::Config(format!("missing env var {env_var} for bearer auth")))?;
                Ok(vec![("Authorization".to_string(), format!("Bearer {value}"))])
            }
            AuthScheme::Basic {
                username_env_var,
                password_env_var,
            } => {
                let user = std::env::var(username_env_var)
                    .map_err(|_| Error::Config(format!("missing env var {username_env_var} for basic auth")))?;
                let pass = std::env::var(password_env_var)
                    .map_err(|_| Error::Config(format!("missing env var {password_env_var} for basic auth")))?;
                let token = BASE64.encode(format!("{user}:{pass}"));
                Ok(vec![("Authorization".to_string(), format!("Basic {token}"))])
            }
            AuthScheme::OAuth2 { env_var } => {
                let value = std::env::var(env_var)
                    .map_err(|_| Error::Config(format!("missing env var {env_var} for oauth2 auth")))?;
                Ok(vec![("Authorization".to_string(), format!("Bearer {value}"))])
            }
            AuthScheme::Custom { description } => {
                Err(Error::Config(format!("custom auth scheme requires caller-supplied headers: {description}")))
            }
        }
    }

    pub async fn get(&self, source: &Datasource, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let params_value: serde_json::Value =
            serde_json::Value::Object(params.iter().map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string()))).collect());
        let key = Self::cache_key(&source.id, HttpMethod::Get, path, &params_value);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }
        let response = self
            .request_with_retry(HttpMethod::Get, source, path, Some(params), None)
            .await?;
        self.cache.write().insert(
            key,
            CacheEntry {
                response: response.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(response)
    }

    pub async fn post(&self, source: &Datasource, path: &str, json: &serde_json::Value) -> Result<ApiResponse> {
        self.request_with_retry(HttpMethod::Post, source, path, None, Some(json)).await
    }

    pub async fn put(&self, source: &Datasource, path: &str, json: &serde_json::Value) -> Result<ApiResponse> {
        self.request_with_retry(HttpMethod::Put, source, path, None, Some(json)).await
    }

    pub async fn delete(&self, source: &Datasource, path: &str) -> Result<ApiResponse> {
        self.request_with_retry(HttpMethod::Delete, source, path, None, None).await
    }

    pub async fn patch(&self, source: &Datasource, path: &str, json: &serde_json::Value) -> Result<ApiResponse> {
        self.request_with_retry(HttpMethod::Patch, source, path, None, Some(json)).await
    }

    fn cached(&self, key: &str) -> Option<ApiResponse> {
        let cache = self.cache.read();
        let entry = cache.get(key)?;
        if entry.inserted_at.elapsed() < self.cache_ttl {
            Some(entry.response.clone())
        } else {
            None
        }
    }

    /// Exponential backoff with a capped retry count on 5xx; 4xx is never
    /// retried.
    async fn request_with_retry(
        &self,
        method: HttpMethod,
        source: &Datasource,
        path: &str,
        query: Option<&[(&str, &str)]>,
        json_body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", source.base_url, path);
        let headers = self.auth_headers(&source.auth)?;

        let mut attempt = 0;
        loop {
            let mut builder = match method {
                HttpMethod::Get => self.http.get(&url),
                HttpMethod::Post => self.http.post(&url),
                HttpMethod::Put => self.http.put(&url),
                HttpMethod::Delete => self.http.delete(&url),
                HttpMethod::Patch => self.http.patch(&url),
            };
            for (name, value) in &headers {
                builder = builder.header(name, value);
            }
            if let Some(q) = query {
                builder = builder.query(q);
            }
            if let Some(body) = json_body {
                builder = builder.json(body);
            }

            let result = builder.send().await;
            match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() && attempt < self.max_retries {
                        attempt += 1;
                        tokio::time::sleep(Duration::from_millis(100 * 2u64.pow(attempt))).await;
                        continue;
                    }
                    let status_code = status.as_u16();
                    let body = resp.text().await.unwrap_or_default();
                    return Ok(ApiResponse { status: status_code, body });
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        attempt += 1;
                        tokio::time::sleep(Duration::from_millis(100 * 2u64.pow(attempt))).await;
                        continue;
                    }
                    return Err(Error::Http(e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_stable_regardless_of_param_insertion_order() {
        let a = serde_json::json!({"b": 1, "a": 2});
        let b = serde_json::json!({"a": 2, "b": 1});
        assert_eq!(
            ApiClient::cache_key("src", HttpMethod::Get, "/x", &a),
            ApiClient::cache_key("src", HttpMethod::Get, "/x", &b)
        );
    }

    #[test]
    fn basic_auth_token_matches_known_vector() {
        let token = BASE64.encode("Aladdin:open sesame");
        assert_eq!(token, "QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }
}
