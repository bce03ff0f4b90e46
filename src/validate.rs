//! Validation: turn the merged mapping into a typed config.
//!
//! Steps:
//!
//! 1. Report required leaves (no default, not `Option`) that no layer set.
//! 2. Deserialize the mapping into `C::Layer` through [`Coerce`], which parses
//!    string scalars into the bool/integer/float the schema asks for. Env vars
//!    and CLI arguments always arrive as strings, so this is where they get
//!    their types. Failures name the innermost dotted path that broke.
//! 3. In strict mode, keys the layer didn't consume (found with
//!    `serde_ignored`) are an error.
//! 4. confique fills remaining defaults and builds `C`.

use std::cell::RefCell;

use confique::Config;
use confique::meta::{FieldKind, LeafKind, Meta};
use serde::Deserialize;
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde_json::{Error as JsonError, Map, Value};

use crate::error::LayerconfError;
use crate::nested::get_nested;

/// Validate a merged mapping against schema `C`.
pub fn validate<C: Config>(mapping: Map<String, Value>, strict: bool) -> Result<C, LayerconfError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let missing = missing_required(&C::META, &mapping);
    if !missing.is_empty() {
        return Err(LayerconfError::MissingValues(missing));
    }

    let failed_at = RefCell::new(None);
    let mut unknown_keys: Vec<String> = Vec::new();
    let root = Coerce {
        value: Value::Object(mapping),
        path: String::new(),
        failed_at: &failed_at,
    };

    let layer: Result<C::Layer, JsonError> = if strict {
        serde_ignored::deserialize(root, |ignored_path| {
            unknown_keys.push(ignored_path.to_string());
        })
    } else {
        <C::Layer as Deserialize>::deserialize(root)
    };
    let layer = layer.map_err(|e| LayerconfError::InvalidValue {
        path: failed_at.take().unwrap_or_else(|| "<root>".into()),
        reason: e.to_string(),
    })?;

    if !unknown_keys.is_empty() {
        return Err(LayerconfError::UnknownKeys(unknown_keys));
    }

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(LayerconfError::from)
}

/// Dotted paths of required leaves that are absent (or `null`) in `mapping`.
///
/// Fields confique reads from their own `#[config(env = ...)]` variable are
/// left for confique to judge.
pub fn missing_required(meta: &Meta, mapping: &Map<String, Value>) -> Vec<String> {
    let mut missing = Vec::new();
    collect_missing(meta, "", mapping, &mut missing);
    missing
}

fn collect_missing(meta: &Meta, prefix: &str, mapping: &Map<String, Value>, out: &mut Vec<String>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf {
                env: None,
                kind: LeafKind::Required { default: None, .. },
                ..
            } => {
                if get_nested(mapping, &dotted).is_none_or(Value::is_null) {
                    out.push(dotted);
                }
            }
            FieldKind::Nested { meta, .. } => collect_missing(meta, &dotted, mapping, out),
            _ => {}
        }
    }
}

/// Deserializer over a JSON value that parses strings into the scalar type
/// the visitor asks for, and records the dotted path of the first failure.
pub(crate) struct Coerce<'t> {
    value: Value,
    path: String,
    failed_at: &'t RefCell<Option<String>>,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

macro_rules! coerce_parsed {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
            if let Value::String(s) = &self.value
                && let Ok(n) = s.trim().parse::<$ty>()
            {
                return visitor.$visit(n);
            }
            self.value.$method(visitor)
        }
    )*};
}

macro_rules! forward_to_value {
    ($($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
            self.value.$method(visitor)
        }
    )*};
}

impl<'de, 't> de::Deserializer<'de> for Coerce<'t> {
    type Error = JsonError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
        match self.value {
            Value::Object(map) => visitor.visit_map(CoerceMap::new(map, self.path, self.failed_at)),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
        if let Value::String(s) = &self.value
            && let Some(b) = parse_bool(s)
        {
            return visitor.visit_bool(b);
        }
        self.value.deserialize_bool(visitor)
    }

    coerce_parsed! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    forward_to_value! {
        deserialize_char deserialize_str deserialize_string deserialize_bytes
        deserialize_byte_buf deserialize_unit deserialize_seq deserialize_identifier
        deserialize_ignored_any
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, JsonError> {
        self.value.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, JsonError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, JsonError> {
        self.value.deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, JsonError> {
        self.value.deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, JsonError> {
        match self.value {
            Value::Object(map) => visitor.visit_map(CoerceMap::new(map, self.path, self.failed_at)),
            other => other.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, JsonError> {
        match self.value {
            Value::Object(map) => visitor.visit_map(CoerceMap::new(map, self.path, self.failed_at)),
            other => other.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, JsonError> {
        self.value.deserialize_enum(name, variants, visitor)
    }
}

struct CoerceMap<'t> {
    entries: serde_json::map::IntoIter,
    pending: Option<(String, Value)>,
    prefix: String,
    failed_at: &'t RefCell<Option<String>>,
}

impl<'t> CoerceMap<'t> {
    fn new(map: Map<String, Value>, prefix: String, failed_at: &'t RefCell<Option<String>>) -> Self {
        Self {
            entries: map.into_iter(),
            pending: None,
            prefix,
            failed_at,
        }
    }
}

impl<'de, 't> MapAccess<'de> for CoerceMap<'t> {
    type Error = JsonError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, JsonError> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        let key_de: de::value::StringDeserializer<JsonError> = key.clone().into_deserializer();
        let out = seed.deserialize(key_de)?;
        self.pending = Some((key, value));
        Ok(Some(out))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, JsonError> {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("map value requested before its key"));
        };
        let path = if self.prefix.is_empty() {
            key
        } else {
            format!("{}.{key}", self.prefix)
        };
        let child = Coerce {
            value,
            path: path.clone(),
            failed_at: self.failed_at,
        };
        seed.deserialize(child).inspect_err(|_| {
            let mut slot = self.failed_at.borrow_mut();
            if slot.is_none() {
                *slot = Some(path);
            }
        })
    }
}
