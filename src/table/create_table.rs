use aws_sdk_dynamodb::{Client, error, operation, types};

/// Scalar type of a key attribute.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AttributeType {
    /// Binary (`B`).
    Binary,
    /// Number (`N`).
    Number,
    /// String (`S`).
    #[default]
    String,
}

impl From<AttributeType> for types::ScalarAttributeType {
    fn from(attribute_type: AttributeType) -> Self {
        match attribute_type {
            AttributeType::Binary => Self::B,
            AttributeType::Number => Self::N,
            AttributeType::String => Self::S,
        }
    }
}

/// Attribute taking part in a key schema.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeyAttribute {
    /// Scalar type of the attribute.
    pub attribute_type: AttributeType,
    /// Attribute name.
    pub name: String,
}

impl KeyAttribute {
    /// String key attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            attribute_type: AttributeType::String,
            name: name.into(),
        }
    }

    /// Number key attribute.
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            attribute_type: AttributeType::Number,
            name: name.into(),
        }
    }
}

/// Provisioned read and write capacity units.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Throughput {
    /// Read capacity units.
    pub read_capacity_units: i64,
    /// Write capacity units.
    pub write_capacity_units: i64,
}

/// Billing of a table.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Capacity {
    /// Pay per request; indexes carry no throughput.
    #[default]
    OnDemand,
    /// Fixed throughput for the table, also used by indexes that do not set their own.
    Provisioned(Throughput),
}

/// Global secondary index: the same items re-keyed by other attributes.
///
/// Index keys are not unique. All attributes are projected into the index.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SecondaryIndex {
    /// Index name.
    pub name: String,
    /// Partition key of the index.
    pub partition_key: KeyAttribute,
    /// Optional sort key of the index.
    pub sort_key: Option<KeyAttribute>,
    /// Throughput of the index, ignored for on-demand tables.
    pub throughput: Option<Throughput>,
}

/// create table operation
#[derive(Clone, Debug, PartialEq)]
struct CreateTableInput {
    attribute_definitions: Vec<types::AttributeDefinition>,
    billing_mode: types::BillingMode,
    global_secondary_indexes: Option<Vec<types::GlobalSecondaryIndex>>,
    key_schema: Vec<types::KeySchemaElement>,
    provisioned_throughput: Option<types::ProvisionedThroughput>,
    table_name: String,
}

/// Create table operation.
///
/// Creation is asynchronous on the service side: the table accepts reads and writes only
/// once [`describe_table`](crate::table::describe_table) reports it active.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use cloud_crud::table::create_table::{Capacity, CreateTable, KeyAttribute, Throughput};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let create_table = CreateTable {
///     capacity: Capacity::Provisioned(Throughput {
///         read_capacity_units: 2,
///         write_capacity_units: 2,
///     }),
///     partition_key: KeyAttribute::string("pk"),
///     sort_key: Some(KeyAttribute::string("sk")),
///     table_name: "Guitar".to_string(),
///     ..Default::default()
/// };
/// create_table.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CreateTable {
    /// Billing mode and throughput.
    pub capacity: Capacity,
    /// Global secondary indexes.
    pub indexes: Vec<SecondaryIndex>,
    /// Partition key of the table.
    pub partition_key: KeyAttribute,
    /// Optional sort key of the table.
    pub sort_key: Option<KeyAttribute>,
    /// Table name.
    pub table_name: String,
}

fn provisioned_throughput(
    throughput: Throughput,
) -> Result<types::ProvisionedThroughput, error::BuildError> {
    types::ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read_capacity_units)
        .write_capacity_units(throughput.write_capacity_units)
        .build()
}

fn key_schema(
    partition_key: &KeyAttribute,
    sort_key: Option<&KeyAttribute>,
) -> Result<Vec<types::KeySchemaElement>, error::BuildError> {
    let mut schema = vec![
        types::KeySchemaElement::builder()
            .attribute_name(&partition_key.name)
            .key_type(types::KeyType::Hash)
            .build()?,
    ];
    if let Some(sort_key) = sort_key {
        schema.push(
            types::KeySchemaElement::builder()
                .attribute_name(&sort_key.name)
                .key_type(types::KeyType::Range)
                .build()?,
        );
    }
    Ok(schema)
}

fn attribute_definitions<'a>(
    attributes: impl IntoIterator<Item = &'a KeyAttribute>,
) -> Result<Vec<types::AttributeDefinition>, error::BuildError> {
    let mut definitions: Vec<types::AttributeDefinition> = Vec::new();
    for attribute in attributes {
        if definitions
            .iter()
            .any(|definition| definition.attribute_name() == attribute.name)
        {
            continue;
        }
        definitions.push(
            types::AttributeDefinition::builder()
                .attribute_name(&attribute.name)
                .attribute_type(attribute.attribute_type.into())
                .build()?,
        );
    }
    Ok(definitions)
}

impl TryFrom<CreateTable> for CreateTableInput {
    type Error = error::BuildError;

    fn try_from(create_table: CreateTable) -> Result<Self, Self::Error> {
        let key_attributes = std::iter::once(&create_table.partition_key)
            .chain(create_table.sort_key.as_ref())
            .chain(
                create_table
                    .indexes
                    .iter()
                    .flat_map(|index| std::iter::once(&index.partition_key).chain(&index.sort_key)),
            );
        let attribute_definitions = attribute_definitions(key_attributes)?;
        let key_schema = key_schema(&create_table.partition_key, create_table.sort_key.as_ref())?;
        let (billing_mode, provisioned_throughput) = match create_table.capacity {
            Capacity::OnDemand => (types::BillingMode::PayPerRequest, None),
            Capacity::Provisioned(throughput) => (
                types::BillingMode::Provisioned,
                Some(provisioned_throughput(throughput)?),
            ),
        };
        let mut global_secondary_indexes = Vec::with_capacity(create_table.indexes.len());
        for index in &create_table.indexes {
            let throughput = match create_table.capacity {
                Capacity::OnDemand => None,
                Capacity::Provisioned(table_throughput) => Some(self::provisioned_throughput(
                    index.throughput.unwrap_or(table_throughput),
                )?),
            };
            let global_secondary_index = types::GlobalSecondaryIndex::builder()
                .index_name(&index.name)
                .set_key_schema(Some(self::key_schema(
                    &index.partition_key,
                    index.sort_key.as_ref(),
                )?))
                .projection(
                    types::Projection::builder()
                        .projection_type(types::ProjectionType::All)
                        .build(),
                )
                .set_provisioned_throughput(throughput)
                .build()?;
            global_secondary_indexes.push(global_secondary_index);
        }
        let global_secondary_indexes =
            (!global_secondary_indexes.is_empty()).then_some(global_secondary_indexes);
        Ok(Self {
            attribute_definitions,
            billing_mode,
            global_secondary_indexes,
            key_schema,
            provisioned_throughput,
            table_name: create_table.table_name,
        })
    }
}

impl CreateTable {
    /// Execute the create table operation.
    #[tracing::instrument(name = "cloud_crud.create_table", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::create_table::CreateTableOutput,
        error::SdkError<operation::create_table::CreateTableError>,
    > {
        let create_table: CreateTableInput = self.try_into()?;
        client
            .create_table()
            .table_name(create_table.table_name)
            .set_attribute_definitions(Some(create_table.attribute_definitions))
            .set_key_schema(Some(create_table.key_schema))
            .billing_mode(create_table.billing_mode)
            .set_provisioned_throughput(create_table.provisioned_throughput)
            .set_global_secondary_indexes(create_table.global_secondary_indexes)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, attribute_type: types::ScalarAttributeType) -> types::AttributeDefinition {
        types::AttributeDefinition::builder()
            .attribute_name(name)
            .attribute_type(attribute_type)
            .build()
            .unwrap()
    }

    fn element(name: &str, key_type: types::KeyType) -> types::KeySchemaElement {
        types::KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    #[test]
    fn test_on_demand_partition_only() {
        let input: CreateTableInput = CreateTable {
            partition_key: KeyAttribute::string("id"),
            table_name: "a".to_string(),
            ..Default::default()
        }
        .try_into()
        .unwrap();
        assert_eq!(
            input,
            CreateTableInput {
                attribute_definitions: vec![definition("id", types::ScalarAttributeType::S)],
                billing_mode: types::BillingMode::PayPerRequest,
                global_secondary_indexes: None,
                key_schema: vec![element("id", types::KeyType::Hash)],
                provisioned_throughput: None,
                table_name: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_provisioned_with_indexes() {
        let table_throughput = Throughput {
            read_capacity_units: 2,
            write_capacity_units: 2,
        };
        let index_throughput = Throughput {
            read_capacity_units: 5,
            write_capacity_units: 1,
        };
        let input: CreateTableInput = CreateTable {
            capacity: Capacity::Provisioned(table_throughput),
            indexes: vec![
                SecondaryIndex {
                    name: "SortKeyIdIndex".to_string(),
                    partition_key: KeyAttribute::string("sk"),
                    sort_key: Some(KeyAttribute::string("pk")),
                    throughput: None,
                },
                SecondaryIndex {
                    name: "PriceIdIndex".to_string(),
                    partition_key: KeyAttribute::string("sk"),
                    sort_key: Some(KeyAttribute::number("price")),
                    throughput: Some(index_throughput),
                },
            ],
            partition_key: KeyAttribute::string("pk"),
            sort_key: Some(KeyAttribute::string("sk")),
            table_name: "Guitar".to_string(),
        }
        .try_into()
        .unwrap();

        assert_eq!(
            input.attribute_definitions,
            vec![
                definition("pk", types::ScalarAttributeType::S),
                definition("sk", types::ScalarAttributeType::S),
                definition("price", types::ScalarAttributeType::N),
            ]
        );
        assert_eq!(
            input.key_schema,
            vec![
                element("pk", types::KeyType::Hash),
                element("sk", types::KeyType::Range),
            ]
        );
        assert_eq!(input.billing_mode, types::BillingMode::Provisioned);
        assert_eq!(
            input.provisioned_throughput,
            Some(provisioned_throughput(table_throughput).unwrap())
        );
        let indexes = input.global_secondary_indexes.unwrap();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].index_name(), "SortKeyIdIndex");
        assert_eq!(
            indexes[0].key_schema(),
            [
                element("sk", types::KeyType::Hash),
                element("pk", types::KeyType::Range),
            ]
        );
        assert_eq!(
            indexes[0].provisioned_throughput(),
            Some(&provisioned_throughput(table_throughput).unwrap())
        );
        assert_eq!(
            indexes[1].provisioned_throughput(),
            Some(&provisioned_throughput(index_throughput).unwrap())
        );
    }

    #[test]
    fn test_on_demand_indexes_have_no_throughput() {
        let input: CreateTableInput = CreateTable {
            indexes: vec![SecondaryIndex {
                name: "i".to_string(),
                partition_key: KeyAttribute::string("b"),
                throughput: Some(Throughput {
                    read_capacity_units: 1,
                    write_capacity_units: 1,
                }),
                ..Default::default()
            }],
            partition_key: KeyAttribute::string("a"),
            table_name: "t".to_string(),
            ..Default::default()
        }
        .try_into()
        .unwrap();
        let indexes = input.global_secondary_indexes.unwrap();
        assert_eq!(indexes[0].provisioned_throughput(), None);
    }
}
