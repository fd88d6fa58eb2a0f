//! PostgREST-style remote record store.
//!
//! Speaks the row API of a hosted record store: equality filters as
//! `?field=eq.value`, ordering via `order=field.direction`, row windows via
//! `offset`/`limit`, exact totals via `Prefer: count=exact` and the
//! `Content-Range` response header, and mutations returning their rows under
//! `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, RANGE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use url::Url;

use crate::domain::ports::{RecordStore, SelectPage, SelectQuery, StoreError};

const PREFER: &str = "Prefer";

/// Remote record store client.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    base: Url,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl RestRecordStore {
    /// Build a client for the store rooted at `base`.
    ///
    /// The API key, when present, is sent both as `apikey` and as a bearer
    /// token, matching hosted PostgREST deployments.
    pub fn new(base: Url, api_key: Option<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| StoreError::connection(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            base,
            http,
            api_key,
        })
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::query("store URL cannot be a base"))?
            .pop_if_empty()
            .push(collection);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.http.request(method, url);
        if let Some(key) = self.api_key.as_deref() {
            builder = builder
                .header("apikey", key)
                .bearer_auth(key);
        }
        builder
    }

    async fn send(builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &body))
        }
    }

    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| StoreError::serialization(format!("malformed store response: {err}")))
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");

        let response = Self::send(self.request(Method::GET, url)).await?;
        let rows = Self::rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn select(
        &self,
        collection: &str,
        query: &SelectQuery,
    ) -> Result<SelectPage, StoreError> {
        let mut url = self.collection_url(collection)?;
        for (key, value) in select_params(query) {
            url.query_pairs_mut().append_pair(&key, &value);
        }

        let request = self
            .request(Method::GET, url)
            .header(PREFER, HeaderValue::from_static("count=exact"))
            // An explicit unit stops proxies reinterpreting the range.
            .header(RANGE, HeaderValue::from_static("items=0-"));
        let response = Self::send(request).await?;

        let total = response
            .headers()
            .get("content-range")
            .and_then(|header| header.to_str().ok())
            .and_then(parse_content_range);
        let records = Self::rows(response).await?;
        let total = total.unwrap_or(records.len() as u64);

        Ok(SelectPage { records, total })
    }

    async fn insert(&self, collection: &str, record: &Value) -> Result<Value, StoreError> {
        let url = self.collection_url(collection)?;
        let request = self
            .request(Method::POST, url)
            .header(PREFER, HeaderValue::from_static("return=representation"))
            .json(record);
        let response = Self::send(request).await?;
        let rows = Self::rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::query("store returned no representation for insert"))
    }

    async fn patch(
        &self,
        collection: &str,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let request = self
            .request(Method::PATCH, url)
            .header(PREFER, HeaderValue::from_static("return=representation"))
            .json(changes);
        let response = Self::send(request).await?;
        let rows = Self::rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let request = self
            .request(Method::DELETE, url)
            .header(PREFER, HeaderValue::from_static("return=representation"));
        let response = Self::send(request).await?;
        let rows = Self::rows(response).await?;
        Ok(!rows.is_empty())
    }
}

fn map_transport_error(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::connection(err.to_string())
    } else {
        StoreError::query(err.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> StoreError {
    if status.is_server_error() {
        StoreError::connection(format!("store responded {status}: {body}"))
    } else {
        StoreError::query(format!("store responded {status}: {body}"))
    }
}

/// Assemble the query-string pairs for a scan.
fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(filter) = &query.filter {
        params.push((
            filter.field.clone(),
            format!("eq.{}", filter_token(&filter.value)),
        ));
    }
    if let Some(sort) = &query.sort {
        params.push(("order".to_owned(), format!("{}.{}", sort.field, sort.order)));
    }
    if let Some(range) = &query.range {
        params.push(("offset".to_owned(), range.offset.to_string()));
        params.push(("limit".to_owned(), range.count.to_string()));
    }
    params
}

/// Render a JSON value as a filter token: strings bare, scalars via JSON.
fn filter_token(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Extract the total from a `Content-Range` header (`0-9/57`, `*/0`,
/// optionally unit-prefixed). `None` when the total is unknown (`/*`).
fn parse_content_range(header: &str) -> Option<u64> {
    let total = header.rsplit('/').next()?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use rstest::rstest;
    use serde_json::json;

    use pagination::SortSpec;

    use crate::domain::ports::{FieldFilter, RowRange};

    use super::*;

    #[rstest]
    #[case("0-9/57", Some(57))]
    #[case("items 0-9/57", Some(57))]
    #[case("*/0", Some(0))]
    #[case("0-9/*", None)]
    #[case("garbage", None)]
    fn content_range_totals(#[case] header: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_content_range(header), expected);
    }

    #[rstest]
    fn select_params_cover_filter_sort_and_range() {
        let query = SelectQuery {
            filter: Some(FieldFilter::eq("tenant_id", "acme")),
            sort: Some(SortSpec::descending("created_at").expect("valid field")),
            range: Some(RowRange {
                offset: 50,
                count: 25,
            }),
        };

        assert_eq!(
            select_params(&query),
            vec![
                ("tenant_id".to_owned(), "eq.acme".to_owned()),
                ("order".to_owned(), "created_at.desc".to_owned()),
                ("offset".to_owned(), "50".to_owned()),
                ("limit".to_owned(), "25".to_owned()),
            ]
        );
    }

    #[rstest]
    fn empty_query_yields_no_params() {
        assert!(select_params(&SelectQuery::default()).is_empty());
    }

    #[rstest]
    #[case(json!("acme"), "acme")]
    #[case(json!(42), "42")]
    #[case(json!(true), "true")]
    fn filter_tokens_render_scalars(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(filter_token(&value), expected);
    }

    #[rstest]
    fn collection_urls_join_without_doubled_slashes() {
        let store = RestRecordStore::new(
            Url::parse("https://db.example.test/rest/v1/").expect("valid URL"),
            None,
        )
        .expect("client builds");
        let url = store.collection_url("work_orders").expect("joinable URL");
        assert_eq!(url.as_str(), "https://db.example.test/rest/v1/work_orders");
    }
}
