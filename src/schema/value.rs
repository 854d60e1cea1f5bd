use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamic front-matter value.
///
/// Emission sites match on the variant to decide how a value is quoted,
/// so no implicit coercion happens between strings, numbers and booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<MetaValue>),
    Map(Metadata),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MetaValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Metadata> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in warnings.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Bare text of a scalar: strings unquoted, numbers and booleans as
    /// literals. `None` for null, arrays, maps and non-finite floats.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => float_text(*f),
            Self::String(s) => Some(s.clone()),
            Self::Null | Self::Array(_) | Self::Map(_) => None,
        }
    }
}

/// Finite floats always keep a decimal point so `1.0` stays a float.
fn float_text(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let text = f.to_string();
    if text.contains('.') {
        Some(text)
    } else {
        Some(format!("{text}.0"))
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(value: Vec<MetaValue>) -> Self {
        Self::Array(value)
    }
}

impl From<Metadata> for MetaValue {
    fn from(value: Metadata) -> Self {
        Self::Map(value)
    }
}

/// Ordered string-keyed map of front-matter values.
///
/// Keys keep the order in which they were first inserted; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The value under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serde support. Both types go through `deserialize_any` so that YAML
// front-matter, RON configuration and JSON from the WASM bridge all land
// in the same shape, with map order preserved.

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct MetaValueVisitor;

impl<'de> Visitor<'de> for MetaValueVisitor {
    type Value = MetaValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a front-matter value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MetaValue, E> {
        Ok(MetaValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MetaValue, E> {
        Ok(MetaValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MetaValue, E> {
        Ok(match i64::try_from(v) {
            Ok(n) => MetaValue::Int(n),
            Err(_) => MetaValue::Float(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MetaValue, E> {
        Ok(MetaValue::Float(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<MetaValue, E> {
        Ok(MetaValue::String(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MetaValue, E> {
        Ok(MetaValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MetaValue, E> {
        Ok(MetaValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<MetaValue, E> {
        Ok(MetaValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<MetaValue, E> {
        Ok(MetaValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<MetaValue, D::Error> {
        MetaValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<MetaValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(MetaValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<MetaValue, A::Error> {
        MetadataVisitor.visit_map(map).map(MetaValue::Map)
    }
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetaValueVisitor)
    }
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of front-matter entries")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Metadata, E> {
        Ok(Metadata::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
        let mut map = Metadata::new();
        while let Some((key, value)) = access.next_entry::<String, MetaValue>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetadataVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut map = Metadata::new();
        map.insert("b", MetaValue::Int(1));
        map.insert("a", MetaValue::Int(2));
        map.insert("b", MetaValue::Int(3));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&MetaValue::Int(3)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn scalar_text_formats() {
        assert_eq!(MetaValue::Int(100).scalar_text().as_deref(), Some("100"));
        assert_eq!(MetaValue::Float(0.5).scalar_text().as_deref(), Some("0.5"));
        assert_eq!(MetaValue::Bool(false).scalar_text().as_deref(), Some("false"));
        assert_eq!(MetaValue::from("Sword").scalar_text().as_deref(), Some("Sword"));
        assert_eq!(MetaValue::Null.scalar_text(), None);
        assert_eq!(MetaValue::Array(vec![]).scalar_text(), None);
    }

    #[test]
    fn whole_floats_keep_decimal_point() {
        assert_eq!(MetaValue::Float(1.0).scalar_text().as_deref(), Some("1.0"));
        assert_eq!(MetaValue::Float(-3.0).scalar_text().as_deref(), Some("-3.0"));
        assert_eq!(MetaValue::Float(2.25).scalar_text().as_deref(), Some("2.25"));
    }

    #[test]
    fn non_finite_floats_have_no_text() {
        assert_eq!(MetaValue::Float(f64::NAN).scalar_text(), None);
        assert_eq!(MetaValue::Float(f64::INFINITY).scalar_text(), None);
        assert_eq!(MetaValue::Float(f64::NEG_INFINITY).scalar_text(), None);
    }

    #[test]
    fn yaml_preserves_key_order_and_types() {
        let yaml = "zeta: 1\nalpha: \"two\"\nmid: true\nratio: 1.5\nitems: [a, b]\nnested:\n  x: ~\n";
        let map: Metadata = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid", "ratio", "items", "nested"]);
        assert_eq!(map.get("zeta"), Some(&MetaValue::Int(1)));
        assert_eq!(map.get_str("alpha"), Some("two"));
        assert_eq!(map.get("mid"), Some(&MetaValue::Bool(true)));
        assert!(matches!(map.get("ratio"), Some(MetaValue::Float(f)) if (*f - 1.5).abs() < f64::EPSILON));
        assert_eq!(map.get("items").and_then(MetaValue::as_array).map(|a| a.len()), Some(2));
        let nested = map.get("nested").and_then(MetaValue::as_map).unwrap();
        assert_eq!(nested.get("x"), Some(&MetaValue::Null));
    }

    #[test]
    fn ron_map_deserializes() {
        let map: Metadata = ron::from_str(r#"{"gold": 0, "name": "Ada", "flags": [true, false]}"#).unwrap();
        assert_eq!(map.get("gold"), Some(&MetaValue::Int(0)));
        assert_eq!(map.get_str("name"), Some("Ada"));
        assert_eq!(map.get("flags").and_then(MetaValue::as_array).map(|a| a.len()), Some(2));
    }

    #[test]
    fn yaml_scalar_is_not_metadata() {
        assert!(serde_yaml::from_str::<Metadata>("just text").is_err());
    }
}
