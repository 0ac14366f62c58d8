//! Cache key construction.
//!
//! Resolver results are cached under `prefix:filter:slug:limit:sort:id`.
//! Segment order is fixed and absent segments render empty, so two keys are
//! equal exactly when every segment is.

use serde_json::Value;

// == Cache Key ==
/// Builder for resolver cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKey {
    prefix: String,
    filter: Option<String>,
    slug: Option<String>,
    limit: Option<u64>,
    sort: Option<String>,
    id: Option<String>,
}

impl CacheKey {
    // == Constructor ==
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    // == Segments ==
    /// Query-shape descriptor, serialized by [`canonical_json`], so logically
    /// equal filters always produce the same segment.
    pub fn filter(mut self, filter: &Value) -> Self {
        self.filter = Some(canonical_json(filter));
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    // == Build ==
    pub fn build(&self) -> String {
        let limit = self.limit.map(|l| l.to_string());
        [
            Some(self.prefix.as_str()),
            self.filter.as_deref(),
            self.slug.as_deref(),
            limit.as_deref(),
            self.sort.as_deref(),
            self.id.as_deref(),
        ]
        .iter()
        .map(|segment| segment.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(":")
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

// == Canonical JSON ==
/// Compact JSON with object keys sorted at every depth.
///
/// Independent of whether `serde_json` is built with `preserve_order`.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_filter_key_order_does_not_matter() {
        let mut inserted_late_first = Map::new();
        inserted_late_first.insert("status".into(), json!("published"));
        inserted_late_first.insert("author".into(), json!({"z": 1, "a": [{"y": 2, "b": 3}]}));

        let key = CacheKey::new("posts")
            .filter(&Value::Object(inserted_late_first))
            .build();

        assert_eq!(
            key,
            r#"posts:{"author":{"a":[{"b":3,"y":2}],"z":1},"status":"published"}::::"#
        );
    }

    #[test]
    fn test_canonical_json_scalars_unchanged() {
        assert_eq!(canonical_json(&json!("x")), r#""x""#);
        assert_eq!(canonical_json(&json!([3, 1, 2])), "[3,1,2]");
    }

    #[test]
    fn test_full_key() {
        let key = CacheKey::new("posts")
            .filter(&json!({"status": "published", "category": "travel"}))
            .slug("iceland")
            .limit(10)
            .sort("-publishedAt")
            .id(42)
            .build();

        assert_eq!(
            key,
            r#"posts:{"category":"travel","status":"published"}:iceland:10:-publishedAt:42"#
        );
    }

    #[test]
    fn test_absent_segments_keep_positions() {
        let key = CacheKey::new("menu").build();
        assert_eq!(key, "menu:::::");

        let by_slug = CacheKey::new("category").slug("food").build();
        assert_eq!(by_slug, "category::food:::");
    }

    #[test]
    fn test_segment_order_matters() {
        let slug_only = CacheKey::new("posts").slug("10").build();
        let limit_only = CacheKey::new("posts").limit(10).build();
        assert_ne!(slug_only, limit_only);
    }

    #[test]
    fn test_display_matches_build() {
        let key = CacheKey::new("photo").id("abc");
        assert_eq!(key.to_string(), key.build());
    }
}
