//! Declarative response normalization.
//!
//! Each snapshot-style operation describes its output as a static table of
//! [`FieldMapping`]s: the output field, one or more lookup paths into the raw
//! provider payload, and the [`Fallback`] that both coerces the value and
//! supplies the default when every path misses. Applying a [`Schema`] always
//! yields every declared field, in table order, and never `null`.
//!
//! ```rust
//! use marketfetch_core::schema::{Fallback, FieldMapping, LookupContext, Schema, Segment};
//! use serde_json::json;
//!
//! const PRICE: Schema = Schema::new(
//!     "price",
//!     &[FieldMapping {
//!         field: "currentPrice",
//!         sources: &[&[Segment::Currency]],
//!         fallback: Fallback::Float,
//!     }],
//! );
//!
//! let record = PRICE.apply(&json!({ "usd": 42 }), &LookupContext::with_currency("usd"));
//! assert_eq!(record.get("currentPrice"), Some(&json!(42.0)));
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

/// Ordered JSON object produced by a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Appends `other`'s fields after the existing ones.
    pub fn merge(&mut self, other: Record) {
        self.0.extend(other.0);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// One step of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Key(&'static str),
    /// Key named by the requested quote currency (`usd`).
    Currency,
    /// Quote currency followed by a fixed suffix (`usd_market_cap`).
    CurrencySuffix(&'static str),
}

/// Output type and default of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// `f64`, default `0.0`.
    Float,
    /// `i64`, default `0`. Fractional inputs are truncated.
    Integer,
    /// String, default as given.
    Text(&'static str),
    /// Uppercased string, default as given.
    UpperText(&'static str),
}

impl Fallback {
    fn default_value(self) -> Value {
        match self {
            Self::Float => Value::from(0.0_f64),
            Self::Integer => Value::from(0_i64),
            Self::Text(text) => Value::from(text),
            Self::UpperText(text) => Value::from(text.to_uppercase()),
        }
    }

    fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            Self::Float => coerce_float(value).map(Value::from),
            Self::Integer => coerce_integer(value).map(Value::from),
            Self::Text(_) => coerce_text(value).map(Value::from),
            Self::UpperText(_) => coerce_text(value).map(|text| Value::from(text.to_uppercase())),
        }
    }
}

/// Output field, candidate source paths (first hit wins), and fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMapping {
    pub field: &'static str,
    pub sources: &'static [&'static [Segment]],
    pub fallback: Fallback,
}

/// Values substituted for dynamic path segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupContext<'a> {
    currency: Option<&'a str>,
}

impl<'a> LookupContext<'a> {
    pub const fn new() -> Self {
        Self { currency: None }
    }

    pub const fn with_currency(currency: &'a str) -> Self {
        Self {
            currency: Some(currency),
        }
    }
}

/// Named table of field mappings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    name: &'static str,
    fields: &'static [FieldMapping],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldMapping]) -> Self {
        Self { name, fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|mapping| mapping.field)
    }

    pub fn apply(&self, payload: &Value, context: &LookupContext<'_>) -> Record {
        let mut record = Record::new();
        self.apply_into(payload, context, &mut record);
        record
    }

    /// Appends this schema's fields to an existing record, after any fields
    /// already present.
    pub fn apply_into(&self, payload: &Value, context: &LookupContext<'_>, record: &mut Record) {
        for mapping in self.fields {
            let value = mapping
                .sources
                .iter()
                .filter_map(|path| resolve(payload, path, context))
                .find_map(|candidate| mapping.fallback.coerce(candidate))
                .unwrap_or_else(|| {
                    trace!(schema = self.name, field = mapping.field, "field defaulted");
                    mapping.fallback.default_value()
                });
            record.insert(mapping.field, value);
        }
    }

    /// Maps at most `limit` entries of `items`, preserving provider order.
    pub fn apply_list(&self, items: &[Value], limit: usize, context: &LookupContext<'_>) -> Vec<Record> {
        items
            .iter()
            .take(limit)
            .map(|item| self.apply(item, context))
            .collect()
    }
}

fn resolve<'v>(payload: &'v Value, path: &[Segment], context: &LookupContext<'_>) -> Option<&'v Value> {
    path.iter().try_fold(payload, |node, segment| match segment {
        Segment::Key(key) => node.get(*key),
        Segment::Currency => node.get(context.currency?),
        Segment::CurrencySuffix(suffix) => node.get(format!("{}{suffix}", context.currency?)),
    })
}

/// Yahoo wraps numbers as `{"raw": 1.5, "fmt": "1.50"}`; an empty wrapper
/// (`{}`) means the value is absent.
fn unwrap_raw(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("raw").unwrap_or(&Value::Null),
        other => other,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    let number = match unwrap_raw(value) {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match unwrap_raw(value) {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds
    value.is_finite().then(|| value.trunc() as i64)
}

/// Empty strings count as missing so later sources can fill them.
fn coerce_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.is_empty())
}
