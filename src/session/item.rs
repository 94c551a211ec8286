use crate::{
    common::value::Record,
    error::{Result, ServiceResultExt},
    read::{get_item::GetItem, query::Query, scan::Scan},
    session::Session,
    write::{delete_item::DeleteItem, put_item::PutItem},
};

use aws_sdk_dynamodb::types;
use std::collections;

fn records(items: Option<Vec<collections::HashMap<String, types::AttributeValue>>>) -> Result<Vec<Record>> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(Record::try_from)
        .collect()
}

fn log_capacity(operation: &'static str, consumed_capacity: Option<&types::ConsumedCapacity>) {
    if let Some(capacity_units) = consumed_capacity.and_then(|capacity| capacity.capacity_units())
    {
        tracing::debug!(operation, capacity_units, "consumed capacity");
    }
}

impl Session {
    /// Insert or replace an item.
    #[tracing::instrument(
        name = "session.put_item",
        skip_all,
        fields(table = %put_item.write_args.table_name),
        err
    )]
    pub async fn put_item(&self, put_item: PutItem) -> Result<bool> {
        let output = put_item
            .send(&self.dynamodb)
            .await
            .or_logged("put_item")?;
        if let Some(output) = &output {
            log_capacity("put_item", output.consumed_capacity());
        }
        Ok(output.is_some())
    }

    /// Item with the given key; `None` when absent or when the read was rejected.
    #[tracing::instrument(
        name = "session.get_item",
        skip_all,
        fields(table = %get_item.single_read_args.table_name),
        err
    )]
    pub async fn get_item(&self, get_item: GetItem) -> Result<Option<Record>> {
        let Some(output) = get_item
            .send(&self.dynamodb)
            .await
            .or_logged("get_item")?
        else {
            return Ok(None);
        };
        log_capacity("get_item", output.consumed_capacity());
        output.item.map(Record::try_from).transpose()
    }

    /// Delete an item. Deleting a missing item succeeds.
    #[tracing::instrument(
        name = "session.delete_item",
        skip_all,
        fields(table = %delete_item.write_args.table_name),
        err
    )]
    pub async fn delete_item(&self, delete_item: DeleteItem) -> Result<bool> {
        let output = delete_item
            .send(&self.dynamodb)
            .await
            .or_logged("delete_item")?;
        Ok(output.is_some())
    }

    /// Every item matching the query, all pages included.
    #[tracing::instrument(
        name = "session.query",
        skip_all,
        fields(
            table = %query.multiple_read_args.table_name,
            index = ?query.multiple_read_args.index_name,
        ),
        err
    )]
    pub async fn query(&self, query: Query) -> Result<Option<Vec<Record>>> {
        let Some(output) = query.send(&self.dynamodb).await.or_logged("query")? else {
            return Ok(None);
        };
        tracing::debug!(count = output.count(), scanned = output.scanned_count(), "query done");
        log_capacity("query", output.consumed_capacity());
        records(output.items).map(Some)
    }

    /// Every item of the table passing the filter, all pages included.
    ///
    /// Reads the whole table whatever the filter.
    #[tracing::instrument(
        name = "session.scan",
        skip_all,
        fields(table = %scan.multiple_read_args.table_name),
        err
    )]
    pub async fn scan(&self, scan: Scan) -> Result<Option<Vec<Record>>> {
        let Some(output) = scan.send(&self.dynamodb).await.or_logged("scan")? else {
            return Ok(None);
        };
        tracing::debug!(count = output.count(), scanned = output.scanned_count(), "scan done");
        log_capacity("scan", output.consumed_capacity());
        records(output.items).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{self, Product},
        config::Config,
        error::Error,
        read::common::SingleReadArgs,
        write::common::WriteArgs,
    };

    use aws_sdk_dynamodb::{
        Client,
        config::{Credentials, Region, retry::RetryConfig},
        operation::{
            delete_item::{DeleteItemError, DeleteItemOutput},
            get_item::{GetItemError, GetItemOutput},
            put_item::{PutItemError, PutItemOutput},
        },
        types::error::ResourceNotFoundException,
    };
    use aws_smithy_mocks::{RuleMode, mock, mock_client};
    use std::sync::{Arc, Mutex};

    type Item = collections::HashMap<String, types::AttributeValue>;

    fn session(dynamodb: Client) -> Session {
        let s3 = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version_latest()
                .region(Region::new("us-east-1"))
                .build(),
        );
        Session::from_clients(dynamodb, s3, reqwest::Client::new(), Config::default())
    }

    fn item_key(item: &Item) -> (String, String) {
        let text = |name: &str| {
            item.get(name)
                .and_then(|value| value.as_s().ok())
                .cloned()
                .unwrap_or_default()
        };
        (text(catalog::PARTITION_KEY), text(catalog::SORT_KEY))
    }

    /// Client whose put, get and delete act on one in-memory table.
    fn table_client() -> Client {
        let items: Arc<Mutex<collections::HashMap<(String, String), Item>>> = Arc::default();
        let requested: Arc<Mutex<Option<(String, String)>>> = Arc::default();

        let stored = Arc::clone(&items);
        let put = mock!(Client::put_item)
            .match_requests(move |input| {
                if let Some(item) = input.item() {
                    stored.lock().unwrap().insert(item_key(item), item.clone());
                }
                true
            })
            .then_output(|| PutItemOutput::builder().build());

        let removed = Arc::clone(&items);
        let delete = mock!(Client::delete_item)
            .match_requests(move |input| {
                if let Some(key) = input.key() {
                    removed.lock().unwrap().remove(&item_key(key));
                }
                true
            })
            .then_output(|| DeleteItemOutput::builder().build());

        let asked = Arc::clone(&requested);
        let get = mock!(Client::get_item)
            .match_requests(move |input| {
                *asked.lock().unwrap() = input.key().map(item_key);
                true
            })
            .then_output(move || {
                let key = requested.lock().unwrap().clone();
                let item = key.and_then(|key| items.lock().unwrap().get(&key).cloned());
                GetItemOutput::builder().set_item(item).build()
            });

        mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&put, &delete, &get])
    }

    /// Client that answers every item request with `ResourceNotFoundException`.
    fn missing_table_client() -> Client {
        let not_found = || {
            ResourceNotFoundException::builder()
                .message("Requested resource not found")
                .build()
        };
        let put = mock!(Client::put_item)
            .then_error(move || PutItemError::ResourceNotFoundException(not_found()));
        let get = mock!(Client::get_item)
            .then_error(move || GetItemError::ResourceNotFoundException(not_found()));
        let delete = mock!(Client::delete_item)
            .then_error(move || DeleteItemError::ResourceNotFoundException(not_found()));
        mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&put, &get, &delete])
    }

    /// Client whose requests never reach a service.
    fn unreachable_client() -> Client {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version_latest()
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .retry_config(RetryConfig::disabled())
            .build();
        Client::from_conf(config)
    }

    fn treat(id: &str, price: &str) -> Product {
        Product {
            pk: id.to_string(),
            sk: "DogTreat".to_string(),
            brand: "Chewy Treats Inc.".to_string(),
            model: "Super Chewy - Plain".to_string(),
            description: "A super yummy, plain flavored treat!".to_string(),
            price: price.parse().unwrap(),
        }
    }

    fn put_item(product: Product) -> PutItem {
        PutItem {
            item: product.into(),
            write_args: WriteArgs {
                table_name: "Guitar".to_string(),
                ..Default::default()
            },
        }
    }

    fn get_item(id: &str) -> GetItem {
        GetItem {
            keys: catalog::keys(id, "DogTreat"),
            single_read_args: SingleReadArgs {
                table_name: "Guitar".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn delete_item(id: &str) -> DeleteItem {
        DeleteItem {
            keys: catalog::keys(id, "DogTreat"),
            write_args: WriteArgs {
                table_name: "Guitar".to_string(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_put_then_get_returns_item() {
        let session = session(table_client());
        assert!(session.put_item(put_item(treat("dt2", "1.59"))).await.unwrap());
        let record = session.get_item(get_item("dt2")).await.unwrap().unwrap();
        assert_eq!(Product::try_from(record).unwrap(), treat("dt2", "1.59"));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_price() {
        let session = session(table_client());
        for (id, price) in [("dt1", "9.99"), ("dt2", "1.59"), ("dt3", "2.19"), ("dt1", "0.99")] {
            assert!(session.put_item(put_item(treat(id, price))).await.unwrap());
        }
        let record = session.get_item(get_item("dt1")).await.unwrap().unwrap();
        let dt1 = Product::try_from(record).unwrap();
        assert_eq!(dt1.price.as_str(), "0.99");
    }

    #[tokio::test]
    async fn test_never_written_item_is_none() {
        let session = session(table_client());
        assert_eq!(session.get_item(get_item("dt9")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_after_delete_is_none() {
        let session = session(table_client());
        assert!(session.put_item(put_item(treat("dt2", "1.59"))).await.unwrap());
        assert!(session.delete_item(delete_item("dt2")).await.unwrap());
        assert_eq!(session.get_item(get_item("dt2")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejections_become_sentinels() {
        let session = session(missing_table_client());
        assert!(!session.put_item(put_item(treat("dt1", "9.99"))).await.unwrap());
        assert_eq!(session.get_item(get_item("dt1")).await.unwrap(), None);
        assert!(!session.delete_item(delete_item("dt1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_transport_error() {
        let session = session(unreachable_client());
        let error = session.get_item(get_item("dt1")).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Transport {
                operation: "get_item",
                ..
            }
        ));
    }
}
