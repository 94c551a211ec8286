//! Demo runner for the product catalog table, object storage and the HTTP probe.

use clap::Parser;
use cloud_crud::{
    catalog::{self, Lookup, Product},
    common::{selection::Selection, value::Record},
    config::{Config, PollPolicy},
    object::select::SelectObject,
    probe,
    read::{common::SingleReadArgs, get_item::GetItem},
    session::Session,
    write::{common::WriteArgs, delete_item::DeleteItem, put_item::PutItem},
};
use std::{error, path::PathBuf, time};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Result<T> = std::result::Result<T, Box<dyn error::Error>>;

/// Exercise DynamoDB, S3 and an HTTP endpoint
#[derive(Debug, Parser)]
#[command(name = "cloud-crud", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
struct Connection {
    /// Region of both services
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// DynamoDB endpoint, e.g. http://localhost:8000
    #[arg(long, global = true, env = "DYNAMODB_ENDPOINT")]
    dynamodb_endpoint: Option<String>,

    /// S3 endpoint
    #[arg(long, global = true, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// Address buckets by path instead of host name
    #[arg(long, global = true, env = "S3_FORCE_PATH_STYLE")]
    s3_force_path_style: bool,

    /// Seconds between table status checks
    #[arg(long, global = true, default_value_t = 10)]
    poll_interval: u64,

    /// Table status checks before giving up
    #[arg(long, global = true, default_value_t = 30)]
    poll_attempts: u32,
}

impl From<Connection> for Config {
    fn from(connection: Connection) -> Self {
        Self {
            dynamodb_endpoint: connection.dynamodb_endpoint,
            poll_policy: PollPolicy {
                interval: time::Duration::from_secs(connection.poll_interval),
                max_attempts: connection.poll_attempts,
            },
            region: connection.region,
            s3_endpoint: connection.s3_endpoint,
            s3_force_path_style: connection.s3_force_path_style,
            ..Default::default()
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create the catalog table, fill it, read it back and drop it
    Dynamodb {
        /// Table name
        #[arg(long, default_value = "Guitar")]
        table: String,

        /// Keep the table at the end
        #[arg(long)]
        keep: bool,
    },

    /// Print one catalog item
    GetItem {
        /// Table name
        #[arg(long, default_value = "Guitar")]
        table: String,

        /// Product id
        #[arg(long)]
        id: String,

        /// Product category
        #[arg(long)]
        category: String,
    },

    /// Delete one catalog item
    DeleteItem {
        /// Table name
        #[arg(long, default_value = "Guitar")]
        table: String,

        /// Product id
        #[arg(long)]
        id: String,

        /// Product category
        #[arg(long)]
        category: String,
    },

    /// Create a bucket, move files through it and remove it
    S3 {
        /// Bucket name
        #[arg(long, env = "BUCKET")]
        bucket: String,

        /// CSV file with a `Title` column
        #[arg(long, default_value = "deniro.csv")]
        csv: PathBuf,

        /// Where downloads are written
        #[arg(long, default_value = "some_data2.txt")]
        download: PathBuf,

        /// SQL run over the CSV file
        #[arg(long, default_value = "SELECT s.Title FROM S3Object s")]
        expression: String,
    },

    /// GET a JSON endpoint and print its posts
    Probe {
        /// Endpoint
        #[arg(long, default_value = probe::DEFAULT_URL)]
        url: String,
    },
}

fn treat(id: &str, model: &str, flavor: &str, price: &str) -> Result<Product> {
    Ok(Product {
        pk: id.to_string(),
        sk: "DogTreat".to_string(),
        brand: "Chewy Treats Inc.".to_string(),
        model: format!("Super Chewy - {model}"),
        description: format!("A super yummy, {flavor} flavored treat!"),
        price: price.parse()?,
    })
}

fn toy(id: &str, size: &str, price: &str) -> Result<Product> {
    Ok(Product {
        pk: id.to_string(),
        sk: size.to_string(),
        brand: "DogToys R Us Inc.".to_string(),
        model: "Rubber Ball".to_string(),
        description: format!("A {size} rubber ball!"),
        price: price.parse()?,
    })
}

fn get_item(table: &str, id: &str, category: &str) -> GetItem {
    GetItem {
        keys: catalog::keys(id, category),
        single_read_args: SingleReadArgs {
            table_name: table.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn delete_item(table: &str, id: &str, category: &str) -> DeleteItem {
    DeleteItem {
        keys: catalog::keys(id, category),
        write_args: WriteArgs {
            table_name: table.to_string(),
            ..Default::default()
        },
    }
}

async fn put_product(session: &Session, table: &str, product: Product) -> Result<()> {
    let put_item = PutItem {
        item: product.into(),
        write_args: WriteArgs {
            return_consumed_capacity: Some(aws_sdk_dynamodb::types::ReturnConsumedCapacity::Total),
            table_name: table.to_string(),
            ..Default::default()
        },
    };
    if !session.put_item(put_item).await? {
        tracing::warn!(table, "item not stored");
    }
    Ok(())
}

fn print_records(label: &str, records: Option<Vec<Record>>) {
    match records {
        Some(records) => {
            println!("{label}: {} item(s)", records.len());
            for record in records {
                println!("  {record:?}");
            }
        }
        None => println!("{label}: request rejected"),
    }
}

async fn dynamodb(session: &Session, table: &str, keep: bool) -> Result<()> {
    if session.create_table(catalog::create_table(table)).await? {
        session.wait_for_table_active(table).await?;
    }

    put_product(session, table, treat("dt1", "Plain", "plain", "9.99")?).await?;
    put_product(session, table, treat("dt2", "Mint", "mint", "1.59")?).await?;
    put_product(session, table, treat("dt3", "Juicy Fruit", "juicy fruit", "2.19")?).await?;

    // Overwrite, not accumulate.
    put_product(session, table, treat("dt1", "Plain", "plain", "0.99")?).await?;
    match session.get_item(get_item(table, "dt1", "DogTreat")).await? {
        Some(record) => {
            let product = Product::try_from(record)?;
            println!("Item: {product:?}");
            println!("{}", product.brand);
        }
        None => println!("Item dt1 not found"),
    }

    put_product(session, table, toy("toy1", "small", "4.99")?).await?;
    put_product(session, table, toy("toy2", "medium", "10.99")?).await?;
    put_product(session, table, toy("toy3", "large", "16.99")?).await?;

    let selection = Selection::from([catalog::MODEL, catalog::BRAND, catalog::PRICE]);
    let by_price = Lookup::PriceBetween("1".parse()?, "2".parse()?).query(
        table,
        "DogTreat",
        Some(selection.clone()),
    );
    print_records("Treats priced 1 to 2", session.query(by_price).await?);

    let by_prefix = Lookup::IdPrefix("dt".to_string()).scan(table, Some(selection));
    print_records("Items whose id starts with dt", session.scan(by_prefix).await?);

    session.delete_item(delete_item(table, "dt2", "DogTreat")).await?;

    if !keep {
        session.delete_table(table).await?;
    }
    Ok(())
}

async fn s3(
    session: &Session,
    bucket: &str,
    csv: PathBuf,
    download: PathBuf,
    expression: String,
) -> Result<()> {
    let csv_key = csv
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("data.csv")
        .to_string();
    let text_key = "some_data.txt";

    print_names("Buckets", session.list_buckets().await?);
    session.create_bucket(bucket, None).await?;
    print_names("Buckets", session.list_buckets().await?);

    session.upload_file(bucket, &csv, &csv_key).await?;
    print_names("Objects", session.list_objects(bucket).await?);
    session.delete_object(bucket, &csv_key).await?;

    session
        .upload_bytes(bucket, text_key, b"This is some data")
        .await?;
    session.delete_object(bucket, text_key).await?;

    session.put_object_file(bucket, &csv_key, &csv).await?;
    session.download_file(bucket, &csv_key, &download).await?;
    if let Some(body) = session.get_object(bucket, &csv_key).await? {
        println!("{csv_key}: {} bytes", body.len());
    }

    if let Some(url) = session
        .presigned_url(bucket, &csv_key, time::Duration::from_secs(3600))
        .await?
    {
        println!("Signed URL: {url}");
        let body = session.fetch_presigned(&url).await?;
        println!("Fetched {} bytes through the signed URL", body.len());
    }

    let select = SelectObject {
        bucket: bucket.to_string(),
        expression,
        key: csv_key.clone(),
        ..Default::default()
    };
    if let Some(mut events) = session.select_object_content(select).await? {
        while let Some(event) = events.next().await? {
            println!("{event:?}");
        }
    }

    session.delete_all_objects(bucket).await?;
    session.delete_bucket(bucket).await?;
    Ok(())
}

fn print_names(label: &str, names: Option<Vec<String>>) {
    match names {
        Some(names) => println!("{label}: {}", names.join(", ")),
        None => println!("{label}: request rejected"),
    }
}

async fn run_probe(session: &Session, url: &str) -> Result<()> {
    let body = session.get_json(url).await?;
    for post in body.posts() {
        println!("{}", post.user_id);
        println!("{}", post.id);
        println!("{}", post.title);
        println!("{}", post.body);
    }
    if let probe::ProbeBody::Other(value) = body {
        println!("{value}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let session = Session::connect(cli.connection.into()).await;

    match cli.command {
        Commands::Dynamodb { table, keep } => dynamodb(&session, &table, keep).await?,
        Commands::GetItem {
            table,
            id,
            category,
        } => match session.get_item(get_item(&table, &id, &category)).await? {
            Some(record) => println!("{record:?}"),
            None => println!("Item not found"),
        },
        Commands::DeleteItem {
            table,
            id,
            category,
        } => {
            let deleted = session
                .delete_item(delete_item(&table, &id, &category))
                .await?;
            println!("Deleted: {deleted}");
        }
        Commands::S3 {
            bucket,
            csv,
            download,
            expression,
        } => s3(&session, &bucket, csv, download, expression).await?,
        Commands::Probe { url } => run_probe(&session, &url).await?,
    }

    Ok(())
}
