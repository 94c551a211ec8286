use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    scan_index_forward: Option<bool>,
}

/// Query operation.
///
/// Reads the items of one partition of the table or of a secondary index, optionally
/// narrowed by a condition on the sort key. All result pages are fetched and returned as
/// a single output.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use cloud_crud::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key::new("sk", "DogTreat"),
///     sort_key_condition: Some(common::condition::KeyCondition::new(
///         "pk",
///         common::condition::Condition::BeginsWith("dt".to_string()),
///     )),
///     multiple_read_args: read::common::MultipleReadArgs {
///         index_name: Some("SortKeyIdIndex".to_string()),
///         table_name: "Guitar".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    /// Additional read operation arguments (table name, index, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs,
    /// The partition key value to query for.
    pub partition_key: common::key::Key,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition to apply to the sort key.
    pub sort_key_condition: Option<common::condition::KeyCondition>,
}

impl Query {
    fn get_key_condition_expression(
        partition_key: common::key::Key,
        sort_key: Option<common::condition::KeyCondition>,
    ) -> common::ExpressionInput {
        let partition_key = common::condition::KeyCondition::new(
            partition_key.name,
            common::condition::Condition::Equals(partition_key.value),
        );
        let mut keys = vec![partition_key];
        if let Some(sort_key) = sort_key {
            keys.push(sort_key);
        }
        common::condition::KeyCondition::get_expression_operation(
            keys,
            &common::condition::LogicalOperator::And,
            &mut 0,
        )
    }
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        let mut multiple_read_operation: read::common::MultipleReadInput =
            query.multiple_read_args.into();
        let key_condition_operation =
            Query::get_key_condition_expression(query.partition_key, query.sort_key_condition);
        let key_condition_expression = key_condition_operation.merge_into(
            &mut multiple_read_operation.expression_attribute_names,
            &mut multiple_read_operation.expression_attribute_values,
        );
        Self {
            key_condition_expression,
            multiple_read_operation,
            return_consumed_capacity: query.return_consumed_capacity,
            scan_index_forward: query.scan_index_forward,
        }
    }
}

impl Query {
    /// Execute the query operation.
    #[tracing::instrument(name = "cloud_crud.query", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.into();
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_return_consumed_capacity(query.return_consumed_capacity)
            .set_scan_index_forward(query.scan_index_forward);
        let mut paginator =
            crate::apply_multiple_read_operation!(builder, query.multiple_read_operation)
                .into_paginator()
                .send();
        crate::get_paginated_output!(paginator, operation::query::QueryOutput)
    }
}
