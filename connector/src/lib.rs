/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod auth;
pub mod error;
pub mod jobdefinitions;
pub mod jobs;
pub mod models;
pub mod remotecis;
pub mod session;
pub mod teams;
pub mod users;

pub use error::{Error, Result};
pub use models::*;
pub use session::{MemoryStore, Session, SessionRecord, SessionSnapshot, SessionState, SessionStore};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use reqwest::Url;
use tracing::debug;

pub const PAGE_SIZE: u64 = 20;

pub type RequestType = reqwest::Method;

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub server_url: String,
    pub session: Arc<Session>,
    http: reqwest::Client,
}

impl RequestConfig {
    pub fn new(server_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            session,
            http: reqwest::Client::new(),
        }
    }

    pub fn api_root(&self) -> String {
        format!("{}/api/v1/", self.server_url)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Meta {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub max_results: Option<u64>,
}

impl Meta {
    pub fn total_count(&self) -> Option<u64> {
        self.count.or(self.total)
    }
}

/// Parameters understood by every list endpoint of the API.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort: Option<&'static str>,
    pub filter: Option<(&'static str, String)>,
    pub embed: Vec<&'static str>,
}

impl ListQuery {
    pub fn page(page: u64) -> Self {
        let page = page.max(1);

        Self {
            limit: Some(PAGE_SIZE),
            offset: Some((page - 1).saturating_mul(PAGE_SIZE)),
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort: &'static str) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.filter = Some((field, value.into()));
        self
    }

    pub fn embed(mut self, relations: &[&'static str]) -> Self {
        self.embed.extend_from_slice(relations);
        self
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }

        if let Some(sort) = self.sort {
            params.push(("sort", sort.to_string()));
        }

        if let Some((field, value)) = &self.filter {
            params.push(("where", format!("{}:{}", field, value)));
        }

        if !self.embed.is_empty() {
            params.push(("embed", self.embed.join(",")));
        }

        params
    }
}

/// Joins `segments` onto the API root, percent-encoding each one.
fn endpoint_url(root: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = root.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidInput(format!("{} cannot be a base URL", root)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

fn get_client(
    config: &RequestConfig,
    endpoint: &[&str],
    request_type: RequestType,
) -> Result<reqwest::RequestBuilder> {
    let root = Url::parse(&config.api_root())
        .map_err(|e| Error::InvalidInput(format!("invalid server URL: {}", e)))?;
    let url = endpoint_url(&root, endpoint)?;
    let authorization = config.session.authorize(url.as_str(), root.as_str())?;

    debug!(method = %request_type, url = %url, "Sending API request");
    let mut client = config.http.request(request_type, url);

    if let Some(authorization) = authorization {
        client = client.header(reqwest::header::AUTHORIZATION, authorization);
    }

    Ok(client)
}

async fn send(config: &RequestConfig, request: reqwest::RequestBuilder) -> Result<Value> {
    let res = request.send().await?;
    let status = res.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        config.session.reject();
        return Err(Error::Unauthorized(res.text().await.unwrap_or_default()));
    }

    let bytes = res.bytes().await?;

    if !status.is_success() {
        return Err(Error::Status {
            status,
            message: error_message(&bytes),
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn error_message(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(body)) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(body).to_string()),
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Pulls `key` out of an API envelope such as `{"job": {...}}` or `{"jobs": [...]}`.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(body: &mut Value, key: &str) -> Result<T> {
    let payload = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| Error::Decode(format!("response has no \"{}\" field", key)))?;

    Ok(serde_json::from_value(payload)?)
}

pub(crate) fn unwrap_meta(body: &mut Value) -> Result<Meta> {
    match body.get_mut("_meta") {
        Some(meta) => Ok(serde_json::from_value(meta.take())?),
        None => Ok(Meta::default()),
    }
}

pub(crate) async fn get_list<T: DeserializeOwned>(
    config: &RequestConfig,
    resource: &str,
    query: &ListQuery,
) -> Result<(Vec<T>, Meta)> {
    let request = get_client(config, &[resource], RequestType::GET)?.query(&query.params());
    let mut body = send(config, request).await?;

    Ok((unwrap_envelope(&mut body, resource)?, unwrap_meta(&mut body)?))
}

pub(crate) async fn get_one<T: DeserializeOwned>(
    config: &RequestConfig,
    endpoint: &[&str],
    key: &str,
    embed: &[&'static str],
) -> Result<T> {
    let mut request = get_client(config, endpoint, RequestType::GET)?;

    if !embed.is_empty() {
        request = request.query(&[("embed", embed.join(","))]);
    }

    let mut body = send(config, request).await?;
    unwrap_envelope(&mut body, key)
}

pub(crate) async fn post_one<B: Serialize, T: DeserializeOwned>(
    config: &RequestConfig,
    endpoint: &[&str],
    key: &str,
    payload: Option<&B>,
) -> Result<T> {
    let mut request = get_client(config, endpoint, RequestType::POST)?;

    if let Some(payload) = payload {
        request = request.json(payload);
    }

    let mut body = send(config, request).await?;
    unwrap_envelope(&mut body, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query_params() {
        let query = ListQuery::page(3)
            .sort("-updated_at")
            .embed(&["remoteci", "jobdefinition.test"]);

        assert_eq!(
            query.params(),
            vec![
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
                ("sort", "-updated_at".to_string()),
                ("embed", "remoteci,jobdefinition.test".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_zero_is_first_page() {
        assert_eq!(ListQuery::page(0).offset, Some(0));
        assert_eq!(ListQuery::page(1).offset, Some(0));
    }

    #[test]
    fn test_huge_page_saturates() {
        assert_eq!(ListQuery::page(u64::MAX).offset, Some(u64::MAX));
        assert_eq!(ListQuery::page(u64::MAX).limit, Some(PAGE_SIZE));
    }

    #[test]
    fn test_endpoint_segments_are_encoded() {
        let root = Url::parse("http://dci.example/api/v1/").unwrap();

        assert_eq!(
            endpoint_url(&root, &["jobs", "foo", "recheck"]).unwrap().as_str(),
            "http://dci.example/api/v1/jobs/foo/recheck"
        );
        assert_eq!(
            endpoint_url(&root, &["users", "bo#b/../teams?x"]).unwrap().as_str(),
            "http://dci.example/api/v1/users/bo%23b%2F..%2Fteams%3Fx"
        );
    }

    #[test]
    fn test_filter_param() {
        let query = ListQuery::default().filter("status", "success");
        assert_eq!(query.params(), vec![("where", "status:success".to_string())]);
    }

    #[test]
    fn test_unwrap_envelope() {
        let mut body = json!({
            "teams": [{"id": "t1", "name": "admin"}],
            "_meta": {"count": 1}
        });

        let teams: Vec<Team> = unwrap_envelope(&mut body, "teams").unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "admin");
        assert_eq!(unwrap_meta(&mut body).unwrap().total_count(), Some(1));
    }

    #[test]
    fn test_unwrap_envelope_missing_key() {
        let mut body = json!({"jobs": []});
        let err = unwrap_envelope::<Vec<Team>>(&mut body, "teams").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_meta_total_fallback() {
        let meta: Meta = serde_json::from_value(json!({"total": 42, "max_results": 20})).unwrap();
        assert_eq!(meta.total_count(), Some(42));
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            error_message(br#"{"message": "conflict on name"}"#),
            "conflict on name"
        );
        assert_eq!(error_message(b"plain failure"), "plain failure");
    }
}
