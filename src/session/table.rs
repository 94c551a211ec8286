use crate::{
    error::{Result, ServiceResultExt},
    session::Session,
    table::{
        create_table::CreateTable,
        delete_table::DeleteTable,
        describe_table::{DescribeTable, TableState},
        wait::wait_until_active,
    },
};

impl Session {
    /// Create a table. Returns once the request is accepted, before the table is active.
    #[tracing::instrument(name = "session.create_table", skip_all, fields(table = %create_table.table_name), err)]
    pub async fn create_table(&self, create_table: CreateTable) -> Result<bool> {
        let created = create_table
            .send(&self.dynamodb)
            .await
            .or_logged("create_table")?;
        Ok(created.is_some())
    }

    /// Current provisioning state of a table.
    #[tracing::instrument(name = "session.describe_table", skip(self), err)]
    pub async fn describe_table(&self, table_name: &str) -> Result<Option<TableState>> {
        let describe_table = DescribeTable {
            table_name: table_name.to_string(),
        };
        let output = describe_table
            .send(&self.dynamodb)
            .await
            .or_logged("describe_table")?;
        Ok(output.and_then(|output| output.table().and_then(TableState::from_description)))
    }

    /// Wait, within the configured poll policy, until a table and its indexes are active.
    #[tracing::instrument(name = "session.wait_for_table_active", skip(self), err)]
    pub async fn wait_for_table_active(&self, table_name: &str) -> Result<()> {
        wait_until_active(table_name, &self.config.poll_policy, || {
            self.describe_table(table_name)
        })
        .await
    }

    /// Delete a table and all of its items.
    #[tracing::instrument(name = "session.delete_table", skip(self), err)]
    pub async fn delete_table(&self, table_name: &str) -> Result<bool> {
        let delete_table = DeleteTable {
            table_name: table_name.to_string(),
        };
        let deleted = delete_table
            .send(&self.dynamodb)
            .await
            .or_logged("delete_table")?;
        Ok(deleted.is_some())
    }
}
