use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// One page of a resource list, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Total row count across all pages, when the endpoint reports it.
    pub total: Option<u64>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self {
            items,
            total: Some(total),
        }
    }
}

/// The list shapes returned by the backend's endpoints. They are decoded
/// here once, so callers only ever see a [`ListPage`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    /// `[...]`
    Bare(Vec<T>),
    /// `{"data": {"items": [...], "total": n}}`
    Nested { data: ListPage<T> },
    /// `{"data": [...], "total": n}`
    DataArray { data: Vec<T>, total: Option<u64> },
    /// `{"items": [...], "total": n}`
    Direct(ListPage<T>),
}

impl<T> From<ListEnvelope<T>> for ListPage<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        match envelope {
            ListEnvelope::Bare(items) => ListPage { items, total: None },
            ListEnvelope::Nested { data } => data,
            ListEnvelope::DataArray { data, total } => ListPage {
                items: data,
                total,
            },
            ListEnvelope::Direct(page) => page,
        }
    }
}

/// Error payload of a failed request. `detail` may be a plain string or a
/// list of validation errors, each with a `msg`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<Value>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// The most specific human-readable message, if any.
    pub fn into_message(self) -> Option<String> {
        let detail = match self.detail {
            Some(Value::String(s)) => Some(s),
            Some(Value::Array(errors)) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .filter_map(|e| match e {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(o) => o
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        };
        detail
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// A 2xx body that carries a business-rule rejection instead of data:
/// `{"success": false, ...}` or a non-zero numeric `code`.
pub fn rejection_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    let failed = object.get("success").and_then(Value::as_bool) == Some(false)
        || object
            .get("code")
            .and_then(Value::as_i64)
            .is_some_and(|code| code != 0 && code != 200);
    if !failed {
        return None;
    }
    let message = object
        .get("message")
        .or_else(|| object.get("detail"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("The request was rejected");
    Some(message.to_string())
}
