//! Shared schema document types
//!
//! Vendor documents are variants of JSON Schema draft-07 with vendor
//! extensions. `Property` models a single pre-normalization node: its type
//! tag may be absent, multi-valued, or a union construct until the type
//! normalizer reduces it to exactly one concrete tag.

use asset_spec_generator_common::OnlyProperties;
use asset_spec_generator_common::SchemaFamily;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// An insertion-ordered string-keyed map.
///
/// Vendor documents are order-sensitive: object property order must survive
/// into the IR, so plain sorted/hashed maps are not usable here.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace, preserving the original position on replace.
    pub fn insert(&mut self, key: String, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Concrete type tags. `json` is not a draft-07 type; it is the tag lossy
/// normalizations degrade to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Json,
    Null,
}

/// The raw `type` field: absent, single, or multi-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeField {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// Boolean or schema-valued `additionalProperties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<Property>),
}

/// One pre-normalization schema property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_field: Option<TypeField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Named reference into the document's definitions. Inlined away by the
    /// dereferencer; a surviving value is a stale marker.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OrderedMap<Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<OrderedMap<Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Property>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Set on the placeholder substituted where dereferencing would
    /// otherwise recurse forever. Never read from vendor input.
    #[serde(skip)]
    pub cycle_sentinel: bool,
}

impl Property {
    /// The single concrete type tag, if normalization has produced one.
    pub fn single_type(&self) -> Option<SchemaType> {
        match &self.type_field {
            Some(TypeField::Single(t)) => Some(*t),
            _ => None,
        }
    }

    /// Has `properties` or `patternProperties`, i.e. can be treated as an
    /// object during normalization.
    pub fn is_object_like(&self) -> bool {
        self.properties.is_some() || self.pattern_properties.is_some()
    }

    /// The placeholder substituted at a reference cycle: an object leaf
    /// carrying the cycled definition's name. Freshly allocated per
    /// occurrence so nodes are never aliased across branches.
    pub fn new_cycle_sentinel(name: &str) -> Self {
        Self {
            type_field: Some(TypeField::Single(SchemaType::Object)),
            title: Some(name.to_string()),
            cycle_sentinel: true,
            ..Default::default()
        }
    }
}

/// Per-resource output of the family converters: everything the IR builder
/// needs to produce one schema variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceIngest {
    /// Vendor type name, e.g. `Vendor::Service::Resource`.
    pub type_name: String,
    pub description: Option<String>,
    pub doc_link: Option<String>,
    pub family: SchemaFamily,
    /// User-settable properties, dereferenced and normalized.
    pub domain: OrderedMap<Property>,
    /// Vendor-emitted properties, dereferenced and normalized.
    pub resource_value: OrderedMap<Property>,
    pub only_properties: OnlyProperties,
    /// Root-level required property names.
    pub required: Vec<String>,
    /// Vendor-declared handler kinds (`create`, `read`, ...); empty means
    /// no declaration, which defaults to the full CRUD set downstream.
    pub handlers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_preserves_insertion_order() {
        let json = r#"{"Zebra": 1, "Apple": 2, "Mango": 3}"#;
        let map: OrderedMap<u32> = serde_json::from_str(json).unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn test_property_multi_type_roundtrip() {
        let json = r#"{"type": ["string", "integer"]}"#;
        let prop: Property = serde_json::from_str(json).unwrap();
        assert_eq!(
            prop.type_field,
            Some(TypeField::Multiple(vec![
                SchemaType::String,
                SchemaType::Integer
            ]))
        );
    }

    #[test]
    fn test_property_single_type() {
        let prop: Property = serde_json::from_str(r#"{"type": "object"}"#).unwrap();
        assert_eq!(prop.single_type(), Some(SchemaType::Object));
        assert!(!prop.is_object_like());
    }
}
