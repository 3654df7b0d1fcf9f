//! Typed decoding of configuration trees.
//!
//! The decoder is a [`serde::Deserializer`] over a borrowed [`Value`] and
//! the [`KeyPath`] leading to it. The target shape is declared once with
//! `#[derive(Deserialize)]` and walked against the tree; string scalars
//! coerce into the declared primitive types, which is the common case for
//! environment and command-line sources. Every failure carries the full
//! dot-joined path of the value that caused it.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer,
    MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;

use crate::error::{StrataError, StrataResult};
use crate::path::KeyPath;
use crate::value::{Dict, Lookup, Value};

#[cfg(test)]
mod tests;

/// Empty object stood in for vacant struct and map positions.
static EMPTY_OBJECT: Dict = Dict::new();

/// Empty backing array for vacant sequence positions.
static EMPTY_ARRAY: [Value; 0] = [];

/// Decode a tree into the target type.
///
/// # Errors
///
/// Returns a decode-level [`StrataError`] ([`MissingRequiredField`],
/// [`TypeMismatch`], [`InvalidBooleanLiteral`] or [`Decode`]) naming the
/// path of the first value that failed.
///
/// [`MissingRequiredField`]: StrataError::MissingRequiredField
/// [`TypeMismatch`]: StrataError::TypeMismatch
/// [`InvalidBooleanLiteral`]: StrataError::InvalidBooleanLiteral
/// [`Decode`]: StrataError::Decode
pub fn from_value<T: DeserializeOwned>(value: &Value) -> StrataResult<T> {
    T::deserialize(TreeDeserializer {
        lookup: Lookup::from(Some(value)),
        path: KeyPath::new(),
    })
}

/// Decode an object root into the target type.
///
/// # Errors
///
/// As [`from_value`].
pub fn from_dict<T: DeserializeOwned>(entries: Dict) -> StrataResult<T> {
    from_value(&Value::Object(entries))
}

/// One decoding position: what the tree holds there and where "there" is.
struct TreeDeserializer<'de> {
    lookup: Lookup<'de>,
    path: KeyPath,
}

impl<'de> TreeDeserializer<'de> {
    fn missing(&self) -> StrataError {
        StrataError::MissingRequiredField {
            path: self.path.clone(),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> StrataError {
        StrataError::TypeMismatch {
            path: self.path.clone(),
            expected,
            found: found.kind().to_owned(),
        }
    }

    /// The value at this position, or `MissingRequiredField` when vacant.
    fn required(&self) -> StrataResult<&'de Value> {
        self.lookup.value().ok_or_else(|| self.missing())
    }

    /// The object at this position; vacant positions read as empty.
    fn object_or_empty(&self) -> StrataResult<&'de Dict> {
        match self.required() {
            Err(_) => Ok(&EMPTY_OBJECT),
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(other) => Err(self.mismatch("object", other)),
        }
    }
}

/// Coerce string text into a boolean per the accepted literal set.
fn boolean_literal(text: &str) -> Option<bool> {
    if text == "1" || text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text == "0" || text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $int:ty : $visit:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> StrataResult<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.required()? {
                    Value::Integer(number) => {
                        let narrowed = <$int>::try_from(*number).map_err(|_| {
                            StrataError::TypeMismatch {
                                path: self.path.clone(),
                                expected: stringify!($int),
                                found: number.to_string(),
                            }
                        })?;
                        visitor.$visit(narrowed)
                    }
                    Value::String(text) => {
                        let parsed = text.parse::<$int>().map_err(|_| {
                            StrataError::TypeMismatch {
                                path: self.path.clone(),
                                expected: stringify!($int),
                                found: text.clone(),
                            }
                        })?;
                        visitor.$visit(parsed)
                    }
                    other => Err(self.mismatch(stringify!($int), other)),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for TreeDeserializer<'de> {
    type Error = StrataError;

    fn deserialize_any<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.lookup {
            Lookup::Absent | Lookup::Null => visitor.visit_unit(),
            Lookup::Present(value) => match value {
                Value::Null => visitor.visit_unit(),
                Value::Bool(flag) => visitor.visit_bool(*flag),
                Value::Integer(number) => visitor.visit_i64(*number),
                Value::Float(number) => visitor.visit_f64(*number),
                Value::String(text) => visitor.visit_str(text),
                Value::Array(_) => self.deserialize_seq(visitor),
                Value::Object(_) => self.deserialize_map(visitor),
            },
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.required()? {
            Value::Bool(flag) => visitor.visit_bool(*flag),
            Value::String(text) => match boolean_literal(text) {
                Some(flag) => visitor.visit_bool(flag),
                None => Err(StrataError::InvalidBooleanLiteral {
                    path: self.path.clone(),
                    value: text.clone(),
                }),
            },
            other => Err(self.mismatch("boolean", other)),
        }
    }

    deserialize_integer! {
        deserialize_i8 => i8 : visit_i8,
        deserialize_i16 => i16 : visit_i16,
        deserialize_i32 => i32 : visit_i32,
        deserialize_i64 => i64 : visit_i64,
        deserialize_u8 => u8 : visit_u8,
        deserialize_u16 => u16 : visit_u16,
        deserialize_u32 => u32 : visit_u32,
        deserialize_u64 => u64 : visit_u64,
    }

    fn deserialize_f32<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "integer layers widen to the float the schema asked for"
    )]
    fn deserialize_f64<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.required()? {
            Value::Float(number) => visitor.visit_f64(*number),
            Value::Integer(number) => visitor.visit_f64(*number as f64),
            Value::String(text) => {
                let parsed = text.parse::<f64>().map_err(|_| StrataError::TypeMismatch {
                    path: self.path.clone(),
                    expected: "float",
                    found: text.clone(),
                })?;
                visitor.visit_f64(parsed)
            }
            other => Err(self.mismatch("float", other)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.required()? {
            Value::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(only), None) => visitor.visit_char(only),
                    _ => Err(StrataError::TypeMismatch {
                        path: self.path.clone(),
                        expected: "single character",
                        found: text.clone(),
                    }),
                }
            }
            other => Err(self.mismatch("single character", other)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.required()? {
            Value::String(text) => visitor.visit_str(text),
            other => Err(self.mismatch("string", other)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.lookup {
            Lookup::Absent | Lookup::Null => visitor.visit_none(),
            Lookup::Present(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.lookup {
            Lookup::Absent | Lookup::Null => visitor.visit_unit(),
            Lookup::Present(value) => Err(self.mismatch("null", value)),
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.lookup {
            // A missing list is an empty list, never a missing field.
            Lookup::Absent | Lookup::Null => visitor.visit_seq(Elements {
                items: EMPTY_ARRAY.iter(),
                position: 0,
                path: &self.path,
            }),
            Lookup::Present(Value::Array(items)) => visitor.visit_seq(Elements {
                items: items.iter(),
                position: 0,
                path: &self.path,
            }),
            Lookup::Present(other) => Err(self.mismatch("array", other)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        let entries = self.object_or_empty()?;
        visitor.visit_map(Entries {
            iter: entries.iter(),
            pending: None,
            path: &self.path,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        let entries = self.object_or_empty()?;
        visitor.visit_map(Fields {
            fields: fields.iter(),
            current: None,
            object: entries,
            path: &self.path,
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.required()? {
            Value::String(variant) => visitor.visit_enum(Variant {
                name: variant,
                payload: Lookup::Absent,
                path: &self.path,
            }),
            Value::Object(entries) => {
                let mut iter = entries.iter();
                match (iter.next(), iter.next()) {
                    (Some((name, payload)), None) => visitor.visit_enum(Variant {
                        name,
                        payload: Lookup::from(Some(payload)),
                        path: &self.path,
                    }),
                    _ => Err(StrataError::TypeMismatch {
                        path: self.path.clone(),
                        expected: "object with a single variant key",
                        found: "object".to_owned(),
                    }),
                }
            }
            other => Err(self.mismatch("enum variant", other)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf
    }
}

/// Sequence access over a borrowed array, extending the path per element.
struct Elements<'de, 'path> {
    items: std::slice::Iter<'de, Value>,
    position: usize,
    path: &'path KeyPath,
}

impl<'de> SeqAccess<'de> for Elements<'de, '_> {
    type Error = StrataError;

    fn next_element_seed<S>(&mut self, seed: S) -> StrataResult<Option<S::Value>>
    where
        S: DeserializeSeed<'de>,
    {
        let Some(item) = self.items.next() else {
            return Ok(None);
        };
        let element_path = self.path.index(self.position);
        self.position += 1;
        seed.deserialize(TreeDeserializer {
            lookup: Lookup::from(Some(item)),
            path: element_path.clone(),
        })
        .map(Some)
        .map_err(|error| error.at(&element_path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Map access yielding every key actually present in the object.
struct Entries<'de, 'path> {
    iter: std::collections::btree_map::Iter<'de, String, Value>,
    pending: Option<(&'de str, &'de Value)>,
    path: &'path KeyPath,
}

impl<'de> MapAccess<'de> for Entries<'de, '_> {
    type Error = StrataError;

    fn next_key_seed<S>(&mut self, seed: S) -> StrataResult<Option<S::Value>>
    where
        S: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.pending = Some((key.as_str(), value));
        seed.deserialize(key.as_str().into_deserializer()).map(Some)
    }

    fn next_value_seed<S>(&mut self, seed: S) -> StrataResult<S::Value>
    where
        S: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("value requested before key"));
        };
        let entry_path = self.path.key(key);
        seed.deserialize(TreeDeserializer {
            lookup: Lookup::from(Some(value)),
            path: entry_path.clone(),
        })
        .map_err(|error| error.at(&entry_path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map access yielding each declared struct field exactly once with the
/// three-state lookup of its entry. Unknown source keys are never yielded.
struct Fields<'de, 'path> {
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
    object: &'de Dict,
    path: &'path KeyPath,
}

impl<'de> MapAccess<'de> for Fields<'de, '_> {
    type Error = StrataError;

    fn next_key_seed<S>(&mut self, seed: S) -> StrataResult<Option<S::Value>>
    where
        S: DeserializeSeed<'de>,
    {
        let Some(&field) = self.fields.next() else {
            return Ok(None);
        };
        self.current = Some(field);
        seed.deserialize(field.into_deserializer()).map(Some)
    }

    fn next_value_seed<S>(&mut self, seed: S) -> StrataResult<S::Value>
    where
        S: DeserializeSeed<'de>,
    {
        let Some(field) = self.current.take() else {
            return Err(de::Error::custom("value requested before key"));
        };
        let field_path = self.path.key(field);
        seed.deserialize(TreeDeserializer {
            lookup: Lookup::from(self.object.get(field)),
            path: field_path.clone(),
        })
        .map_err(|error| error.at(&field_path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Enum access selecting a variant by name, with an optional payload tree.
struct Variant<'de, 'path> {
    name: &'de str,
    payload: Lookup<'de>,
    path: &'path KeyPath,
}

impl<'de> EnumAccess<'de> for Variant<'de, '_> {
    type Error = StrataError;
    type Variant = Self;

    fn variant_seed<S>(self, seed: S) -> StrataResult<(S::Value, Self::Variant)>
    where
        S: DeserializeSeed<'de>,
    {
        let tag = seed.deserialize(IntoDeserializer::<StrataError>::into_deserializer(self.name))?;
        Ok((tag, self))
    }
}

impl<'de> VariantAccess<'de> for Variant<'de, '_> {
    type Error = StrataError;

    fn unit_variant(self) -> StrataResult<()> {
        match self.payload {
            Lookup::Absent | Lookup::Null => Ok(()),
            Lookup::Present(value) => Err(StrataError::TypeMismatch {
                path: self.path.clone(),
                expected: "unit variant",
                found: value.kind().to_owned(),
            }),
        }
    }

    fn newtype_variant_seed<S>(self, seed: S) -> StrataResult<S::Value>
    where
        S: DeserializeSeed<'de>,
    {
        let variant_path = self.path.key(self.name);
        seed.deserialize(TreeDeserializer {
            lookup: self.payload,
            path: variant_path.clone(),
        })
        .map_err(|error| error.at(&variant_path))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        TreeDeserializer {
            lookup: self.payload,
            path: self.path.key(self.name),
        }
        .deserialize_seq(visitor)
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> StrataResult<V::Value>
    where
        V: Visitor<'de>,
    {
        TreeDeserializer {
            lookup: self.payload,
            path: self.path.key(self.name),
        }
        .deserialize_struct("", fields, visitor)
    }
}
