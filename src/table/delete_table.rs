use aws_sdk_dynamodb::{Client, error, operation};

/// Delete table operation.
///
/// Removes the table and every item in it.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DeleteTable {
    /// Table name.
    pub table_name: String,
}

impl DeleteTable {
    /// Execute the delete table operation.
    #[tracing::instrument(name = "cloud_crud.delete_table", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_table::DeleteTableOutput,
        error::SdkError<operation::delete_table::DeleteTableError>,
    > {
        client
            .delete_table()
            .table_name(self.table_name)
            .send()
            .await
    }
}
