//! Pocket v3 API client.
//!
//! `POST /get` returns the reading list as an object keyed by item id (or an
//! empty array when the list is empty); `POST /send` applies batched
//! actions.  Both use JSON bodies carrying the consumer key and access token.

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ItemSource, SourceError};
use crate::config::AppConfig;
use crate::core::item::Item;

/// Item status Pocket uses for entries that were deleted.
const STATUS_DELETED: &str = "2";

pub struct PocketClient {
    http: Client,
    endpoint: String,
    consumer_key: String,
    access_token: String,
}

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    consumer_key: &'a str,
    access_token: &'a str,
    state: &'a str,
    sort: &'a str,
    #[serde(rename = "detailType")]
    detail_type: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    consumer_key: &'a str,
    access_token: &'a str,
    actions: [SendAction<'a>; 1],
}

#[derive(Serialize)]
struct SendAction<'a> {
    action: &'a str,
    item_id: &'a str,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    list: RawList,
}

/// `list` is an object when there are items and `[]` when there are none.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Keyed(serde_json::Map<String, Value>),
    Empty(Vec<Value>),
}

impl Default for RawList {
    fn default() -> Self {
        RawList::Empty(Vec::new())
    }
}

#[derive(Deserialize)]
struct RawItem {
    item_id: String,
    #[serde(default)]
    resolved_title: String,
    #[serde(default)]
    given_title: String,
    #[serde(default)]
    resolved_url: String,
    #[serde(default)]
    given_url: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    status: String,
    sort_id: Option<u64>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let title = if raw.resolved_title.is_empty() { raw.given_title } else { raw.resolved_title };
        let url = if raw.resolved_url.is_empty() { raw.given_url } else { raw.resolved_url };
        Item {
            id: raw.item_id,
            title,
            url,
            excerpt: raw.excerpt,
        }
    }
}

#[derive(Deserialize)]
struct SendResponse {
    status: i64,
    #[serde(default)]
    action_results: Vec<Value>,
}

impl PocketClient {
    pub fn new(config: &AppConfig) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            consumer_key: config.credentials.consumer_key.clone(),
            access_token: config.credentials.access_token.clone(),
        })
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<String, SourceError> {
        let url = format!("{}/{path}", self.endpoint);
        tracing::debug!(%url, "pocket request");
        let response = self
            .http
            .post(&url)
            .header("X-Accept", "application/json")
            .json(body)
            .send()?;
        Ok(check_status(response)?.text()?)
    }

    fn send(&self, action: &'static str, item_id: &str) -> Result<(), SourceError> {
        let request = SendRequest {
            consumer_key: &self.consumer_key,
            access_token: &self.access_token,
            actions: [SendAction { action, item_id }],
        };
        let body = self.post("send", &request)?;
        let response: SendResponse = serde_json::from_str(&body)?;
        let rejected = response.status != 1 || response.action_results.iter().any(|r| r == &Value::Bool(false));
        if rejected {
            return Err(SourceError::Rejected {
                action,
                item_id: item_id.to_string(),
            });
        }
        tracing::debug!(action, item_id, "pocket action applied");
        Ok(())
    }
}

impl ItemSource for PocketClient {
    fn retrieve(&mut self) -> Result<Vec<Item>, SourceError> {
        let request = RetrieveRequest {
            consumer_key: &self.consumer_key,
            access_token: &self.access_token,
            state: "unread",
            sort: "newest",
            detail_type: "simple",
        };
        let body = self.post("get", &request)?;
        let items = decode_items(&body)?;
        tracing::debug!(count = items.len(), "retrieved reading list");
        Ok(items)
    }

    fn archive(&mut self, item_id: &str) -> Result<(), SourceError> {
        self.send("archive", item_id)
    }

    fn delete(&mut self, item_id: &str) -> Result<(), SourceError> {
        self.send("delete", item_id)
    }
}

/// Pocket reports failures through the `X-Error` header.
fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .headers()
        .get("X-Error")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(SourceError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Decode a `/get` response body into the ordered snapshot.
///
/// Entries are ordered by `sort_id`; entries without one keep their
/// response position after those that have it.
fn decode_items(body: &str) -> Result<Vec<Item>, SourceError> {
    let response: RetrieveResponse = serde_json::from_str(body)?;
    let values = match response.list {
        RawList::Keyed(map) => map.into_iter().map(|(_, v)| v).collect(),
        RawList::Empty(values) => values,
    };

    let mut raw = values
        .into_iter()
        .map(serde_json::from_value::<RawItem>)
        .collect::<Result<Vec<_>, _>>()?;
    raw.retain(|item| item.status != STATUS_DELETED);
    raw.sort_by_key(|item| item.sort_id.unwrap_or(u64::MAX));

    Ok(raw.into_iter().map(Item::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_list_is_decoded_in_sort_order() {
        let body = r#"{
            "status": 1,
            "list": {
                "229279689": {
                    "item_id": "229279689",
                    "resolved_id": "229279689",
                    "given_url": "http://given.example/a",
                    "given_title": "Given A",
                    "resolved_title": "Resolved A",
                    "resolved_url": "https://resolved.example/a",
                    "excerpt": "An excerpt.",
                    "status": "0",
                    "sort_id": 1
                },
                "11": {
                    "item_id": "11",
                    "given_url": "http://given.example/b",
                    "given_title": "Given B",
                    "resolved_title": "",
                    "status": "0",
                    "sort_id": 0
                }
            }
        }"#;

        let items = decode_items(body).unwrap();

        assert_eq!(
            items,
            vec![
                Item::new("11", "Given B", "http://given.example/b", ""),
                Item::new("229279689", "Resolved A", "https://resolved.example/a", "An excerpt."),
            ]
        );
    }

    #[test]
    fn empty_list_arrives_as_array() {
        let items = decode_items(r#"{"status": 2, "complete": 1, "list": []}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn missing_sort_ids_keep_response_order() {
        let body = r#"{"list": {
            "3": {"item_id": "3", "given_title": "c"},
            "1": {"item_id": "1", "given_title": "a"},
            "2": {"item_id": "2", "given_title": "b"}
        }}"#;
        let ids: Vec<String> = decode_items(body).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn deleted_entries_are_skipped() {
        let body = r#"{"list": {
            "1": {"item_id": "1", "status": "2"},
            "2": {"item_id": "2", "status": "0"}
        }}"#;
        let items = decode_items(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "2");
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(decode_items("<html>"), Err(SourceError::Decode(_))));
        assert!(matches!(
            decode_items(r#"{"list": {"1": {"given_title": "no id"}}}"#),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn send_request_shape() {
        let request = SendRequest {
            consumer_key: "ck",
            access_token: "at",
            actions: [SendAction {
                action: "archive",
                item_id: "42",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "consumer_key": "ck",
                "access_token": "at",
                "actions": [{"action": "archive", "item_id": "42"}]
            })
        );
    }
}
