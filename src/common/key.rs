use crate::common::value::Value;

use aws_sdk_dynamodb::types;
use std::collections;

/// Key component.
///
/// ```rust
/// use cloud_crud::common::key;
///
/// let key = key::Key::new("pk", "dt1");
/// assert_eq!(key.name, "pk");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: Value,
}

impl Key {
    /// Key attribute with its value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use cloud_crud::common::key;
///
/// let keys = key::Keys {
///     partition_key: key::Key::new("pk", "dt1"),
///     sort_key: Some(key::Key::new("sk", "DogTreat")),
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys {
    /// The partition key (required).
    pub partition_key: Key,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<Key>,
}

impl Keys {
    /// Composite primary key.
    pub fn composite(partition_key: Key, sort_key: Key) -> Self {
        Self {
            partition_key,
            sort_key: Some(sort_key),
        }
    }
}

impl From<Keys> for collections::HashMap<String, types::AttributeValue> {
    fn from(keys: Keys) -> Self {
        let mut map = Self::from([(keys.partition_key.name, keys.partition_key.value.into())]);
        if let Some(sort_key) = keys.sort_key {
            map.insert(sort_key.name, sort_key.value.into());
        }
        map
    }
}
