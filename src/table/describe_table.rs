use aws_sdk_dynamodb::{Client, error, operation, types};

/// Describe table operation.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DescribeTable {
    /// Table name.
    pub table_name: String,
}

impl DescribeTable {
    /// Execute the describe table operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::describe_table::DescribeTableOutput,
        error::SdkError<operation::describe_table::DescribeTableError>,
    > {
        client
            .describe_table()
            .table_name(self.table_name)
            .send()
            .await
    }
}

/// Provisioning state of a table and of its global secondary indexes.
#[derive(Clone, Debug, PartialEq)]
pub struct TableState {
    /// Status of each global secondary index, by index name.
    pub indexes: Vec<(String, types::IndexStatus)>,
    /// Status of the table itself.
    pub status: types::TableStatus,
}

impl TableState {
    /// Whether the table and every index accept reads and writes.
    pub fn is_active(&self) -> bool {
        self.status == types::TableStatus::Active
            && self
                .indexes
                .iter()
                .all(|(_, status)| *status == types::IndexStatus::Active)
    }
}

impl TableState {
    /// Extract the state from a describe table response, if it carries a status.
    pub fn from_description(description: &types::TableDescription) -> Option<Self> {
        let status = description.table_status()?.clone();
        let indexes = description
            .global_secondary_indexes()
            .iter()
            .filter_map(|index| {
                let name = index.index_name()?.to_string();
                let status = index.index_status()?.clone();
                Some((name, status))
            })
            .collect();
        Some(Self { indexes, status })
    }
}
