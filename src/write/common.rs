use aws_sdk_dynamodb::types;

/// Internal representation of write operation parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

/// Arguments common to all write operations (Put, Delete).
///
/// Writes are unconditional: a put replaces whatever item has the same primary key and
/// a delete of a missing item succeeds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Whether to return the consumed capacity information.
    ///
    /// Useful for monitoring and capacity planning.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Which item attributes to return in the response.
    ///
    /// Put and delete accept `AllOld` or `None`.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl From<WriteArgs> for WriteInput {
    fn from(write_args: WriteArgs) -> Self {
        Self {
            return_consumed_capacity: write_args.return_consumed_capacity,
            return_values: write_args.return_values,
            table_name: write_args.table_name,
        }
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_return_consumed_capacity($write_operation.return_consumed_capacity)
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}
