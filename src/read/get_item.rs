use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct GetItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// A missing item is not an error: the output simply carries no item.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use cloud_crud::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys::composite(
///         common::key::Key::new("pk", "dt1"),
///         common::key::Key::new("sk", "DogTreat"),
///     ),
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "Guitar".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Additional read operation arguments (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl From<GetItem> for GetItemInput {
    fn from(get_item: GetItem) -> Self {
        Self {
            keys: get_item.keys.into(),
            return_consumed_capacity: get_item.return_consumed_capacity,
            single_read_operation: get_item.single_read_args.into(),
        }
    }
}

impl GetItem {
    /// Execute the get item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: GetItemInput = self.into();
        let builder = client
            .get_item()
            .set_key(Some(get_item.keys))
            .set_return_consumed_capacity(get_item.return_consumed_capacity);
        crate::apply_single_read_operation!(builder, get_item.single_read_operation)
            .send()
            .await
    }
}
