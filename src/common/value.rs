use crate::error::{Error, Result};

use aws_sdk_dynamodb::{primitives::Blob, types};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::{collections, fmt, str};

/// Decimal number carried as text.
///
/// DynamoDB transmits numbers as decimal strings. Keeping them as text end to end means a
/// price such as `0.99` is stored exactly as written instead of going through binary
/// floating point.
///
/// ```rust
/// use cloud_crud::common::value::Number;
///
/// let price: Number = "0.99".parse().unwrap();
/// assert_eq!(price.as_str(), "0.99");
/// assert!("0.9.9".parse::<Number>().is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Number(String);

impl Number {
    /// The decimal text of the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(position) => (&unsigned[..position], Some(&unsigned[position + 1..])),
        None => (unsigned, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };
    let digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    let mantissa_ok = match fraction {
        Some(fraction) => {
            digits(integer) && digits(fraction) && !(integer.is_empty() && fraction.is_empty())
        }
        None => !integer.is_empty() && digits(integer),
    };
    let exponent_ok = match exponent {
        Some(exponent) => {
            let exponent = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
            !exponent.is_empty() && digits(exponent)
        }
        None => true,
    };
    mantissa_ok && exponent_ok
}

impl str::FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if is_decimal(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(Error::InvalidNumber(text.to_string()))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! number_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Number {
                fn from(value: $integer) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Attribute value, one variant per wire type marker.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Binary payload (`B`).
    B(Vec<u8>),
    /// Boolean (`BOOL`).
    Bool(bool),
    /// Binary set (`BS`).
    Bs(Vec<Vec<u8>>),
    /// List (`L`).
    L(Vec<Value>),
    /// Map (`M`).
    M(IndexMap<String, Value>),
    /// Number (`N`).
    N(Number),
    /// Number set (`NS`).
    Ns(Vec<Number>),
    /// Null (`NULL`).
    #[default]
    Null,
    /// String (`S`).
    S(String),
    /// String set (`SS`).
    Ss(Vec<String>),
}

impl Value {
    /// The string, if this is an `S` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(text) => Some(text),
            _ => None,
        }
    }

    /// The number, if this is an `N` value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::N(number) => Some(number),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::S(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::S(text)
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Self::N(number)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Value> for types::AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::B(bytes) => Self::B(Blob::new(bytes)),
            Value::Bool(value) => Self::Bool(value),
            Value::Bs(items) => Self::Bs(items.into_iter().map(Blob::new).collect()),
            Value::L(items) => Self::L(items.into_iter().map(Self::from).collect()),
            Value::M(map) => Self::M(
                map.into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            ),
            Value::N(number) => Self::N(number.0),
            Value::Ns(numbers) => Self::Ns(numbers.into_iter().map(|number| number.0).collect()),
            Value::Null => Self::Null(true),
            Value::S(text) => Self::S(text),
            Value::Ss(items) => Self::Ss(items),
        }
    }
}

fn sorted_map(
    map: collections::HashMap<String, types::AttributeValue>,
) -> Result<IndexMap<String, Value>> {
    let mut entries = map
        .into_iter()
        .map(|(name, value)| Ok((name, Value::try_from(value)?)))
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by(|(left, _), (right, _)| left.cmp(right));
    Ok(entries.into_iter().collect())
}

impl TryFrom<types::AttributeValue> for Value {
    type Error = Error;

    fn try_from(value: types::AttributeValue) -> Result<Self> {
        let value = match value {
            types::AttributeValue::B(blob) => Self::B(blob.into_inner()),
            types::AttributeValue::Bool(value) => Self::Bool(value),
            types::AttributeValue::Bs(blobs) => {
                Self::Bs(blobs.into_iter().map(Blob::into_inner).collect())
            }
            types::AttributeValue::L(items) => Self::L(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_>>()?,
            ),
            types::AttributeValue::M(map) => Self::M(sorted_map(map)?),
            types::AttributeValue::N(text) => Self::N(text.parse()?),
            types::AttributeValue::Ns(items) => Self::Ns(
                items
                    .iter()
                    .map(|text| text.parse())
                    .collect::<Result<_>>()?,
            ),
            types::AttributeValue::Null(_) => Self::Null,
            types::AttributeValue::S(text) => Self::S(text),
            types::AttributeValue::Ss(items) => Self::Ss(items),
            other => return Err(Error::UnsupportedAttribute(format!("{other:?}"))),
        };
        Ok(value)
    }
}

/// A stored item: attribute names mapped to values.
///
/// Attributes keep insertion order; records decoded from a service response are ordered
/// by attribute name.
///
/// ```rust
/// use cloud_crud::common::value::{Number, Record};
///
/// let record = Record::new()
///     .with("pk", "dt1")
///     .with("sk", "DogTreat")
///     .with("price", "0.99".parse::<Number>().unwrap());
/// assert_eq!(record.get_str("pk"), Some("dt1"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Attribute by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String attribute by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Number attribute by name.
    pub fn get_number(&self, name: &str) -> Option<&Number> {
        self.get(name).and_then(Value::as_number)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Decode into a typed struct through `serde_dynamo`.
    ///
    /// Numbers are parsed into whatever numeric type the target field declares.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        let item: collections::HashMap<String, types::AttributeValue> = self.into();
        Ok(serde_dynamo::from_item(item)?)
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Record> for collections::HashMap<String, types::AttributeValue> {
    fn from(record: Record) -> Self {
        record
            .0
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect()
    }
}

impl TryFrom<collections::HashMap<String, types::AttributeValue>> for Record {
    type Error = Error;

    fn try_from(item: collections::HashMap<String, types::AttributeValue>) -> Result<Self> {
        Ok(Self(sorted_map(item)?))
    }
}
