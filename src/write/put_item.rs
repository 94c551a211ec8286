use crate::{common::value::Record, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// Creates the item, or replaces every attribute of an existing item with the same
/// primary key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use cloud_crud::{common::value::{Number, Record}, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: Record::new()
///         .with("pk", "dt1")
///         .with("sk", "DogTreat")
///         .with("price", "0.99".parse::<Number>()?),
///     write_args: write::common::WriteArgs {
///         table_name: "Guitar".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem {
    /// The item to put into the table, key attributes included.
    pub item: Record,
    /// Additional write operation arguments (table name, return values, etc.).
    pub write_args: write::common::WriteArgs,
}

impl From<PutItem> for PutItemInput {
    fn from(put_item: PutItem) -> Self {
        Self {
            item: put_item.item.into(),
            write_operation: put_item.write_args.into(),
        }
    }
}

impl PutItem {
    /// Execute the put item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.into();
        let builder = client.put_item().set_item(Some(put_item.item));
        crate::apply_write_operation!(builder, put_item.write_operation)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::Product,
        common::fixtures::{n, s},
    };

    use rstest::rstest;

    fn mint_treat() -> Product {
        Product {
            pk: "dt2".to_string(),
            sk: "DogTreat".to_string(),
            brand: "Chewy Treats Inc.".to_string(),
            model: "Super Chewy - Mint".to_string(),
            description: "A super yummy, mint flavored treat!".to_string(),
            price: "1.59".parse().unwrap(),
        }
    }

    #[rstest]
    #[case::keys_only(
        PutItem {
            item: Record::new().with("pk", "toy1").with("sk", "small"),
            write_args: write::common::WriteArgs {
                table_name: "Guitar".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from([
                ("pk".to_string(), s("toy1")),
                ("sk".to_string(), s("small")),
            ]),
            write_operation: write::common::WriteInput {
                table_name: "Guitar".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::product_returning_old_item(
        PutItem {
            item: mint_treat().into(),
            write_args: write::common::WriteArgs {
                return_consumed_capacity: Some(types::ReturnConsumedCapacity::Total),
                return_values: Some(types::ReturnValue::AllOld),
                table_name: "Guitar".to_string(),
            },
        },
        PutItemInput {
            item: collections::HashMap::from([
                ("pk".to_string(), s("dt2")),
                ("sk".to_string(), s("DogTreat")),
                ("brand".to_string(), s("Chewy Treats Inc.")),
                ("model".to_string(), s("Super Chewy - Mint")),
                ("description".to_string(), s("A super yummy, mint flavored treat!")),
                ("price".to_string(), n("1.59")),
            ]),
            write_operation: write::common::WriteInput {
                return_consumed_capacity: Some(types::ReturnConsumedCapacity::Total),
                return_values: Some(types::ReturnValue::AllOld),
                table_name: "Guitar".to_string(),
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.into();
        assert_eq!(actual, expected);
    }
}
