//! Page position arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Page Args ==
/// Arguments a paginated field was queried with.
///
/// `start` decides the merge mode: absent (or JSON `null`) means the incoming
/// page replaces the whole sequence. Arguments other than the paging ones are
/// kept in `extra` so field policies can partition on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageArgs {
    // == Builders ==
    /// Arguments for the page beginning at `start`.
    pub fn at(start: i64, limit: u64) -> Self {
        Self {
            start: Some(start),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Adds a non-paging argument.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    // == Lookup ==
    /// Looks up any argument by its query name (`start`, `limit`, `afterId`, or extra).
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "start" => self.start.map(Value::from),
            "limit" => self.limit.map(Value::from),
            "afterId" => self.after_id.clone().map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }
}
