//! Catalog record model.
//!
//! Records are stored exactly as they arrived from their source. Every field
//! keeps its original JSON scalar, and defaults are only substituted by the
//! read accessors, so a malformed record is never rejected nor rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A single JSON scalar as received from a data source.
///
/// Variant order matters for the untagged representation: integers are tried
/// before floats so that `1980` stays an integer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Text form of the value. Numbers render as decimal text, anything else
    /// has no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            FieldValue::Float(f) if f.is_finite() => Some(Cow::Owned(format_float(*f))),
            _ => None,
        }
    }

    /// Integer form of the value, accepting integral floats and numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Float(f) => integral_float(*f),
            FieldValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral_float))
            }
            _ => None,
        }
    }

    /// Floating point form of the value, accepting numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

fn integral_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub(crate) fn format_float(f: f64) -> String {
    match integral_float(f) {
        Some(i) => i.to_string(),
        None => f.to_string(),
    }
}

/// A vinyl record catalog entry.
///
/// Decoding never fails for a JSON object. Known fields may arrive under
/// their canonical key or an alias; the canonical key wins when both are
/// present and the alias entry stays in `extra`. Encoding writes each known
/// field back under the key it arrived with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    pub id: Option<FieldValue>,
    pub artist: Option<FieldValue>,
    pub title: Option<FieldValue>,
    pub label: Option<FieldValue>,
    pub catalog_no: Option<FieldValue>,
    pub original_release_year: Option<FieldValue>,
    pub estimated_value_low: Option<FieldValue>,
    pub estimated_value_high: Option<FieldValue>,
    pub format: Option<FieldValue>,

    /// Fields this crate does not interpret (notes, cover art, ...).
    pub extra: Map<String, Value>,

    /// Alias each known field was read from, keyed by canonical name.
    pub source_keys: BTreeMap<String, String>,
}

const ID: &str = "id";
const ARTIST: &str = "artist";
const TITLE: &str = "title";
const LABEL: &str = "label";
const CATALOG_NO: &str = "catalog_no";
const RELEASE_YEAR: &str = "original_release_year";
const VALUE_LOW: &str = "estimated_value_low";
const VALUE_HIGH: &str = "estimated_value_high";
const FORMAT: &str = "format";

const NO_ALIASES: &[&str] = &[];
const CATALOG_NO_ALIASES: &[&str] = &["catalogNumber", "catalog_number"];
const RELEASE_YEAR_ALIASES: &[&str] = &["originalReleaseYear"];
const VALUE_LOW_ALIASES: &[&str] = &["estimatedValueLow"];
const VALUE_HIGH_ALIASES: &[&str] = &["estimatedValueHigh"];

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => FieldValue::Integer(i),
                (None, Some(f)) => FieldValue::Float(f),
                (None, None) => FieldValue::Other(Value::Number(n)),
            },
            other => FieldValue::Other(other),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Integer(i) => Value::from(i),
            FieldValue::Float(f) => Value::from(f),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Other(v) => v,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(mut object: Map<String, Value>) -> Self {
        let mut source_keys = BTreeMap::new();
        let mut take = |canonical: &str, aliases: &[&str]| -> Option<FieldValue> {
            if let Some(value) = object.remove(canonical) {
                return Some(value.into());
            }
            let (alias, value) = aliases
                .iter()
                .find_map(|alias| object.remove(*alias).map(|value| (*alias, value)))?;
            source_keys.insert(canonical.to_string(), alias.to_string());
            Some(value.into())
        };

        let id = take(ID, NO_ALIASES);
        let artist = take(ARTIST, NO_ALIASES);
        let title = take(TITLE, NO_ALIASES);
        let label = take(LABEL, NO_ALIASES);
        let catalog_no = take(CATALOG_NO, CATALOG_NO_ALIASES);
        let original_release_year = take(RELEASE_YEAR, RELEASE_YEAR_ALIASES);
        let estimated_value_low = take(VALUE_LOW, VALUE_LOW_ALIASES);
        let estimated_value_high = take(VALUE_HIGH, VALUE_HIGH_ALIASES);
        let format = take(FORMAT, NO_ALIASES);

        Record {
            id,
            artist,
            title,
            label,
            catalog_no,
            original_release_year,
            estimated_value_low,
            estimated_value_high,
            format,
            extra: object,
            source_keys,
        }
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        let Record {
            id,
            artist,
            title,
            label,
            catalog_no,
            original_release_year,
            estimated_value_low,
            estimated_value_high,
            format,
            extra,
            source_keys,
        } = record;

        let mut object = extra;
        let mut put = |canonical: &str, value: Option<FieldValue>| {
            if let Some(value) = value {
                let key = source_keys
                    .get(canonical)
                    .cloned()
                    .unwrap_or_else(|| canonical.to_string());
                object.insert(key, value.into());
            }
        };

        put(ID, id);
        put(ARTIST, artist);
        put(TITLE, title);
        put(LABEL, label);
        put(CATALOG_NO, catalog_no);
        put(RELEASE_YEAR, original_release_year);
        put(VALUE_LOW, estimated_value_low);
        put(VALUE_HIGH, estimated_value_high);
        put(FORMAT, format);
        object
    }
}

fn text_or_empty(value: &Option<FieldValue>) -> Cow<'_, str> {
    value
        .as_ref()
        .and_then(FieldValue::as_text)
        .unwrap_or(Cow::Borrowed(""))
}

fn non_negative_or_zero(value: &Option<FieldValue>) -> f64 {
    value
        .as_ref()
        .and_then(FieldValue::as_f64)
        .filter(|v| *v >= 0.0)
        .unwrap_or(0.0)
}

impl Record {
    pub fn artist(&self) -> Cow<'_, str> {
        text_or_empty(&self.artist)
    }

    pub fn title(&self) -> Cow<'_, str> {
        text_or_empty(&self.title)
    }

    pub fn label(&self) -> Cow<'_, str> {
        text_or_empty(&self.label)
    }

    /// Trimmed catalog number, `None` when absent or blank.
    pub fn catalog_number(&self) -> Option<Cow<'_, str>> {
        let text = self.catalog_no.as_ref()?.as_text()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match text {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
            Cow::Owned(s) => Cow::Owned(s.trim().to_owned()),
        })
    }

    /// Release year, `None` if absent or not an integer.
    pub fn release_year(&self) -> Option<i32> {
        self.original_release_year
            .as_ref()
            .and_then(FieldValue::as_i64)
            .and_then(|y| i32::try_from(y).ok())
    }

    /// Format as stored, `None` if absent or empty.
    pub fn format(&self) -> Option<Cow<'_, str>> {
        self.format
            .as_ref()
            .and_then(FieldValue::as_text)
            .filter(|f| !f.is_empty())
    }

    pub fn value_low(&self) -> f64 {
        non_negative_or_zero(&self.estimated_value_low)
    }

    pub fn value_high(&self) -> f64 {
        non_negative_or_zero(&self.estimated_value_high)
    }
}
