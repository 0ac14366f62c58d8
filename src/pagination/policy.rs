//! Field policies: which arguments select which cached sequence.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::cache::canonical_json;
use crate::pagination::PageArgs;

type KeyFn = Arc<dyn Fn(&PageArgs) -> String + Send + Sync>;

// == Key Args ==
/// How a paginated field's arguments partition its cached sequences.
#[derive(Clone)]
pub enum KeyArgs {
    /// One sequence for the field no matter the arguments; plain
    /// `start`/`limit` paging over a single list.
    Shared,
    /// One sequence per distinct combination of the named arguments.
    Fields(Vec<String>),
    /// One sequence per value computed from the arguments.
    Custom(KeyFn),
}

impl KeyArgs {
    // == Constructors ==
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyArgs::Fields(names.into_iter().map(Into::into).collect())
    }

    pub fn custom(f: impl Fn(&PageArgs) -> String + Send + Sync + 'static) -> Self {
        KeyArgs::Custom(Arc::new(f))
    }

    // == Storage Key ==
    /// Storage key of the sequence `args` address within `field`.
    ///
    /// `Shared` gives `field`, `Fields` gives `field({"name":value,...})` with
    /// absent arguments left out, `Custom` gives `field:computed`.
    pub fn storage_key(&self, field: &str, args: Option<&PageArgs>) -> String {
        match self {
            KeyArgs::Shared => field.to_owned(),
            KeyArgs::Fields(names) => {
                let selected: Map<String, Value> = names
                    .iter()
                    .filter_map(|name| {
                        args.and_then(|args| args.get(name))
                            .map(|value| (name.clone(), value))
                    })
                    .collect();
                format!("{field}({})", canonical_json(&Value::Object(selected)))
            }
            KeyArgs::Custom(key_fn) => {
                let empty = PageArgs::default();
                format!("{field}:{}", key_fn(args.unwrap_or(&empty)))
            }
        }
    }
}

impl fmt::Debug for KeyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyArgs::Shared => f.write_str("Shared"),
            KeyArgs::Fields(names) => f.debug_tuple("Fields").field(names).finish(),
            KeyArgs::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
