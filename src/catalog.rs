//! Product catalog table.
//!
//! Products are keyed by an id (`pk`) and a category (`sk`). Two global secondary
//! indexes re-key them by category: [`SORT_KEY_INDEX`] sorts a category by id and
//! [`PRICE_INDEX`] sorts it by price. Lookups are a fixed set of predicate kinds, each
//! mapped to one key condition on one index.

use crate::{
    common::{
        condition::{Condition, Filter, KeyCondition},
        key::{Key, Keys},
        selection::Selection,
        value::{Number, Record},
    },
    error::{Error, Result},
    read::{common::MultipleReadArgs, query::Query, scan::Scan},
    table::create_table::{Capacity, CreateTable, KeyAttribute, SecondaryIndex, Throughput},
};

/// Product id, partition key of the table.
pub const PARTITION_KEY: &str = "pk";
/// Product category, sort key of the table.
pub const SORT_KEY: &str = "sk";
/// Manufacturer.
pub const BRAND: &str = "brand";
/// Product name.
pub const MODEL: &str = "model";
/// Free text.
pub const DESCRIPTION: &str = "description";
/// Unit price.
pub const PRICE: &str = "price";

/// Index keyed by category, sorted by id.
pub const SORT_KEY_INDEX: &str = "SortKeyIdIndex";
/// Index keyed by category, sorted by price.
pub const PRICE_INDEX: &str = "PriceIdIndex";

const THROUGHPUT: Throughput = Throughput {
    read_capacity_units: 2,
    write_capacity_units: 2,
};

/// Table definition for a catalog named `table_name`.
pub fn create_table(table_name: impl Into<String>) -> CreateTable {
    CreateTable {
        capacity: Capacity::Provisioned(THROUGHPUT),
        indexes: vec![
            SecondaryIndex {
                name: SORT_KEY_INDEX.to_string(),
                partition_key: KeyAttribute::string(SORT_KEY),
                sort_key: Some(KeyAttribute::string(PARTITION_KEY)),
                throughput: Some(THROUGHPUT),
            },
            SecondaryIndex {
                name: PRICE_INDEX.to_string(),
                partition_key: KeyAttribute::string(SORT_KEY),
                sort_key: Some(KeyAttribute::number(PRICE)),
                throughput: Some(THROUGHPUT),
            },
        ],
        partition_key: KeyAttribute::string(PARTITION_KEY),
        sort_key: Some(KeyAttribute::string(SORT_KEY)),
        table_name: table_name.into(),
    }
}

/// Catalog item.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Product {
    /// Product id.
    pub pk: String,
    /// Category.
    pub sk: String,
    /// Manufacturer.
    pub brand: String,
    /// Product name.
    pub model: String,
    /// Free text.
    pub description: String,
    /// Unit price, kept as decimal text.
    pub price: Number,
}

impl Product {
    /// Primary key of the product.
    pub fn keys(&self) -> Keys {
        keys(&self.pk, &self.sk)
    }
}

/// Primary key of the product `id` in `category`.
pub fn keys(id: impl Into<String>, category: impl Into<String>) -> Keys {
    Keys::composite(
        Key::new(PARTITION_KEY, id.into()),
        Key::new(SORT_KEY, category.into()),
    )
}

impl From<Product> for Record {
    fn from(product: Product) -> Self {
        Record::new()
            .with(PARTITION_KEY, product.pk)
            .with(SORT_KEY, product.sk)
            .with(BRAND, product.brand)
            .with(MODEL, product.model)
            .with(DESCRIPTION, product.description)
            .with(PRICE, product.price)
    }
}

fn required_str(record: &Record, name: &str) -> Result<String> {
    record
        .get_str(name)
        .map(str::to_string)
        .ok_or_else(|| Error::MissingAttribute(name.to_string()))
}

impl TryFrom<Record> for Product {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        Ok(Self {
            pk: required_str(&record, PARTITION_KEY)?,
            sk: required_str(&record, SORT_KEY)?,
            brand: required_str(&record, BRAND)?,
            model: required_str(&record, MODEL)?,
            description: required_str(&record, DESCRIPTION)?,
            price: record
                .get_number(PRICE)
                .cloned()
                .ok_or_else(|| Error::MissingAttribute(PRICE.to_string()))?,
        })
    }
}

/// Indexed lookups within one category.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    /// The product with this id.
    Id(String),
    /// Products whose id starts with this prefix.
    IdPrefix(String),
    /// Products priced within the inclusive range.
    PriceBetween(Number, Number),
}

impl Lookup {
    /// Query answering the lookup within `category`.
    ///
    /// Id lookups read [`SORT_KEY_INDEX`], price ranges read [`PRICE_INDEX`].
    pub fn query(
        self,
        table_name: impl Into<String>,
        category: impl Into<String>,
        selection: Option<Selection>,
    ) -> Query {
        let (index_name, sort_key_condition) = match self {
            Self::Id(id) => (
                SORT_KEY_INDEX,
                KeyCondition::new(PARTITION_KEY, Condition::Equals(id.into())),
            ),
            Self::IdPrefix(prefix) => (
                SORT_KEY_INDEX,
                KeyCondition::new(PARTITION_KEY, Condition::BeginsWith(prefix)),
            ),
            Self::PriceBetween(low, high) => (
                PRICE_INDEX,
                KeyCondition::new(PRICE, Condition::Between(low.into(), high.into())),
            ),
        };
        Query {
            multiple_read_args: MultipleReadArgs {
                index_name: Some(index_name.to_string()),
                selection,
                table_name: table_name.into(),
                ..Default::default()
            },
            partition_key: Key::new(SORT_KEY, category.into()),
            sort_key_condition: Some(sort_key_condition),
            ..Default::default()
        }
    }

    /// Unindexed scan of the whole table applying the lookup as a filter.
    ///
    /// Cost grows with the table size whatever the selectivity of the filter.
    pub fn scan(self, table_name: impl Into<String>, selection: Option<Selection>) -> Scan {
        let condition = match self {
            Self::Id(id) => KeyCondition::new(PARTITION_KEY, Condition::Equals(id.into())),
            Self::IdPrefix(prefix) => {
                KeyCondition::new(PARTITION_KEY, Condition::BeginsWith(prefix))
            }
            Self::PriceBetween(low, high) => {
                KeyCondition::new(PRICE, Condition::Between(low.into(), high.into()))
            }
        };
        Scan {
            multiple_read_args: MultipleReadArgs {
                filter: Some(Filter::single(condition)),
                selection,
                table_name: table_name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
