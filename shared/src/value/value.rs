use std::collections::BTreeMap;

use replica_serde::{check_length, ByteReader, ByteWrite, Serde, SerdeErr};
use serde::{Deserialize, Serialize};

use crate::{
    error::EncodeError,
    types::ResourceId,
    value::math::{Color, FloatComponents, Quat, Vec3},
};

/// A dynamically typed property value.
///
/// The document form is adjacently tagged, e.g.
/// `{ "$type": "Vec3", "value": { "x": 0.0, "y": 1.0, "z": 0.0 } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Vec3(Vec3),
    Quat(Quat),
    Color(Color),
    List(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Resource(ResourceId),
    Struct {
        name: String,
        fields: BTreeMap<String, Value>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueTag {
    Null = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    Str = 4,
    Vec3 = 5,
    Quat = 6,
    Color = 7,
    List = 8,
    Dict = 9,
    Resource = 10,
    Struct = 11,
}

impl ValueTag {
    pub fn from_u8(tag: u8) -> Option<Self> {
        let output = match tag {
            0 => Self::Null,
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::Float,
            4 => Self::Str,
            5 => Self::Vec3,
            6 => Self::Quat,
            7 => Self::Color,
            8 => Self::List,
            9 => Self::Dict,
            10 => Self::Resource,
            11 => Self::Struct,
            _ => return None,
        };
        Some(output)
    }
}

impl Value {
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::Str(_) => ValueTag::Str,
            Value::Vec3(_) => ValueTag::Vec3,
            Value::Quat(_) => ValueTag::Quat,
            Value::Color(_) => ValueTag::Color,
            Value::List(_) => ValueTag::List,
            Value::Dict(_) => ValueTag::Dict,
            Value::Resource(_) => ValueTag::Resource,
            Value::Struct { .. } => ValueTag::Struct,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.tag() {
            ValueTag::Null => "Null",
            ValueTag::Bool => "Bool",
            ValueTag::Int => "Int",
            ValueTag::Float => "Float",
            ValueTag::Str => "Str",
            ValueTag::Vec3 => "Vec3",
            ValueTag::Quat => "Quat",
            ValueTag::Color => "Color",
            ValueTag::List => "List",
            ValueTag::Dict => "Dict",
            ValueTag::Resource => "Resource",
            ValueTag::Struct => "Struct",
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Checks every length in the value fits the `int32` prefixes of the
    /// byte format.
    pub(crate) fn check_lengths(&self, field: &'static str) -> Result<(), EncodeError> {
        let check = |length: usize| {
            check_length(length)
                .map(|_| ())
                .map_err(|_| EncodeError::LengthOverflow { field, length })
        };
        match self {
            Value::Str(text) => check(text.len()),
            Value::List(items) => {
                check(items.len())?;
                items.iter().try_for_each(|item| item.check_lengths(field))
            }
            Value::Dict(entries) => Self::check_entries(entries, field),
            Value::Struct { name, fields } => {
                check(name.len())?;
                Self::check_entries(fields, field)
            }
            _ => Ok(()),
        }
    }

    fn check_entries(
        entries: &BTreeMap<String, Value>,
        field: &'static str,
    ) -> Result<(), EncodeError> {
        check_length(entries.len())
            .map_err(|_| EncodeError::LengthOverflow { field, length: entries.len() })?;
        for (key, value) in entries {
            check_length(key.len())
                .map_err(|_| EncodeError::LengthOverflow { field, length: key.len() })?;
            value.check_lengths(field)?;
        }
        Ok(())
    }

    /// Documents cannot carry NaN or infinities.
    pub(crate) fn check_finite(&self, field: &'static str) -> Result<(), EncodeError> {
        let finite = match self {
            Value::Float(number) => number.is_finite(),
            Value::Vec3(vector) => vector.all_finite(),
            Value::Quat(rotation) => rotation.all_finite(),
            Value::Color(color) => color.all_finite(),
            Value::List(items) => {
                return items.iter().try_for_each(|item| item.check_finite(field));
            }
            Value::Dict(entries) | Value::Struct { fields: entries, .. } => {
                return entries.values().try_for_each(|item| item.check_finite(field));
            }
            _ => true,
        };
        if finite {
            Ok(())
        } else {
            Err(EncodeError::NonFiniteFloat { field })
        }
    }
}

impl Serde for Value {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        (self.tag() as u8).ser(writer);
        match self {
            Value::Null => {}
            Value::Bool(value) => value.ser(writer),
            Value::Int(value) => value.ser(writer),
            Value::Float(value) => value.ser(writer),
            Value::Str(value) => value.ser(writer),
            Value::Vec3(value) => value.ser(writer),
            Value::Quat(value) => value.ser(writer),
            Value::Color(value) => value.ser(writer),
            Value::List(items) => items.ser(writer),
            Value::Dict(entries) => entries.ser(writer),
            Value::Resource(id) => id.ser(writer),
            Value::Struct { name, fields } => {
                name.ser(writer);
                fields.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        let Some(tag) = ValueTag::from_u8(tag) else {
            return Err(SerdeErr::UnknownTag {
                type_name: "Value",
                tag,
            });
        };
        let output = match tag {
            ValueTag::Null => Value::Null,
            ValueTag::Bool => Value::Bool(bool::de(reader)?),
            ValueTag::Int => Value::Int(i64::de(reader)?),
            ValueTag::Float => Value::Float(f64::de(reader)?),
            ValueTag::Str => Value::Str(String::de(reader)?),
            ValueTag::Vec3 => Value::Vec3(Vec3::de(reader)?),
            ValueTag::Quat => Value::Quat(Quat::de(reader)?),
            ValueTag::Color => Value::Color(Color::de(reader)?),
            ValueTag::List => Value::List(reader.nested(Vec::de)?),
            ValueTag::Dict => Value::Dict(reader.nested(BTreeMap::de)?),
            ValueTag::Resource => Value::Resource(ResourceId::de(reader)?),
            ValueTag::Struct => reader.nested(|reader| {
                Ok(Value::Struct {
                    name: String::de(reader)?,
                    fields: BTreeMap::de(reader)?,
                })
            })?,
        };
        Ok(output)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec3> for Value {
    fn from(value: Vec3) -> Self {
        Value::Vec3(value)
    }
}

impl From<Quat> for Value {
    fn from(value: Quat) -> Self {
        Value::Quat(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Value::Color(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Dict(value)
    }
}
