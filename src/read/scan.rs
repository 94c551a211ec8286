use crate::read;

use aws_sdk_dynamodb::{Client, error, operation, types};

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
struct ScanInput {
    multiple_read_operation: read::common::MultipleReadInput,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

/// Scan operation.
///
/// Reads every item of the table (or index) and applies the filter afterwards, so the
/// cost is proportional to the table size whatever the filter selectivity. Prefer a
/// [`Query`](crate::read::query::Query) whenever a key condition can express the lookup.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use cloud_crud::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let scan = read::scan::Scan {
///     multiple_read_args: read::common::MultipleReadArgs {
///         filter: Some(common::condition::Filter::single(
///             common::condition::KeyCondition::new(
///                 "pk",
///                 common::condition::Condition::BeginsWith("dt".to_string()),
///             ),
///         )),
///         table_name: "Guitar".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// scan.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    /// Additional read operation arguments (table name, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs,
    /// Whether to return the consumed capacity information.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

impl From<Scan> for ScanInput {
    fn from(scan: Scan) -> Self {
        Self {
            multiple_read_operation: scan.multiple_read_args.into(),
            return_consumed_capacity: scan.return_consumed_capacity,
        }
    }
}

impl Scan {
    /// Execute the scan operation.
    #[tracing::instrument(name = "cloud_crud.scan", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::scan::ScanOutput, error::SdkError<operation::scan::ScanError>> {
        let scan: ScanInput = self.into();
        let builder = client
            .scan()
            .set_return_consumed_capacity(scan.return_consumed_capacity);
        let mut paginator =
            crate::apply_multiple_read_operation!(builder, scan.multiple_read_operation)
                .into_paginator()
                .send();
        crate::get_paginated_output!(paginator, operation::scan::ScanOutput)
    }
}
