use crate::error::{Result, ServiceResultExt};

use aws_sdk_s3::{
    Client, error, operation,
    primitives::event_stream::EventReceiver,
    types::{self, error::SelectObjectContentEventStreamError},
};

/// How the first line of a CSV object is treated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum HeaderRow {
    /// Header names columns and can be referenced in the expression.
    #[default]
    Use,
    /// Header is skipped.
    Ignore,
    /// There is no header line.
    Absent,
}

impl From<HeaderRow> for types::FileHeaderInfo {
    fn from(header_row: HeaderRow) -> Self {
        match header_row {
            HeaderRow::Use => types::FileHeaderInfo::Use,
            HeaderRow::Ignore => types::FileHeaderInfo::Ignore,
            HeaderRow::Absent => types::FileHeaderInfo::None,
        }
    }
}

/// Format of the queried object.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InputFormat {
    /// Comma separated values.
    Csv(HeaderRow),
    /// One JSON document per line.
    JsonLines,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self::Csv(HeaderRow::default())
    }
}

impl From<InputFormat> for types::InputSerialization {
    fn from(input_format: InputFormat) -> Self {
        let builder = types::InputSerialization::builder();
        match input_format {
            InputFormat::Csv(header_row) => builder.csv(
                types::CsvInput::builder()
                    .file_header_info(header_row.into())
                    .build(),
            ),
            InputFormat::JsonLines => builder.json(
                types::JsonInput::builder()
                    .r#type(types::JsonType::Lines)
                    .build(),
            ),
        }
        .build()
    }
}

/// Format of the returned records.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OutputFormat {
    /// Comma separated values.
    Csv,
    /// One JSON document per record.
    #[default]
    Json,
}

impl From<OutputFormat> for types::OutputSerialization {
    fn from(output_format: OutputFormat) -> Self {
        let builder = types::OutputSerialization::builder();
        match output_format {
            OutputFormat::Csv => builder.csv(types::CsvOutput::builder().build()),
            OutputFormat::Json => builder.json(types::JsonOutput::builder().build()),
        }
        .build()
    }
}

/// select object content operation
#[derive(Clone, Debug, PartialEq)]
struct SelectObjectInput {
    bucket: String,
    expression: String,
    input_serialization: types::InputSerialization,
    key: String,
    output_serialization: types::OutputSerialization,
}

/// Server-side SQL query over one object.
///
/// ```rust,no_run
/// use aws_sdk_s3::Client;
/// use cloud_crud::object::select::{SelectEvents, SelectObject};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let select = SelectObject {
///     bucket: "movies".to_string(),
///     expression: "SELECT s.Title FROM S3Object s".to_string(),
///     key: "deniro.csv".to_string(),
///     ..Default::default()
/// };
/// let mut events = SelectEvents::from(select.send(client).await?);
/// while let Some(event) = events.next().await? {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SelectObject {
    /// Bucket name.
    pub bucket: String,
    /// SQL expression.
    pub expression: String,
    /// Format of the object.
    pub input: InputFormat,
    /// Object key.
    pub key: String,
    /// Format of the returned records.
    pub output: OutputFormat,
}

impl From<SelectObject> for SelectObjectInput {
    fn from(select: SelectObject) -> Self {
        Self {
            bucket: select.bucket,
            expression: select.expression,
            input_serialization: select.input.into(),
            key: select.key,
            output_serialization: select.output.into(),
        }
    }
}

impl SelectObject {
    /// Execute the select object content operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::select_object_content::SelectObjectContentOutput,
        error::SdkError<operation::select_object_content::SelectObjectContentError>,
    > {
        let select: SelectObjectInput = self.into();
        client
            .select_object_content()
            .bucket(select.bucket)
            .key(select.key)
            .expression(select.expression)
            .expression_type(types::ExpressionType::Sql)
            .input_serialization(select.input_serialization)
            .output_serialization(select.output_serialization)
            .send()
            .await
    }
}

/// Byte counters reported while a query runs and once it completes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SelectCounters {
    /// Bytes of the object read.
    pub bytes_scanned: Option<i64>,
    /// Bytes after decompression.
    pub bytes_processed: Option<i64>,
    /// Bytes of records sent back.
    pub bytes_returned: Option<i64>,
}

impl From<&types::Stats> for SelectCounters {
    fn from(stats: &types::Stats) -> Self {
        Self {
            bytes_scanned: stats.bytes_scanned(),
            bytes_processed: stats.bytes_processed(),
            bytes_returned: stats.bytes_returned(),
        }
    }
}

impl From<&types::Progress> for SelectCounters {
    fn from(progress: &types::Progress) -> Self {
        Self {
            bytes_scanned: progress.bytes_scanned(),
            bytes_processed: progress.bytes_processed(),
            bytes_returned: progress.bytes_returned(),
        }
    }
}

/// Event of a select response stream.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SelectEvent {
    /// A chunk of result records in the requested output format.
    Records(Vec<u8>),
    /// Final counters.
    Stats(SelectCounters),
    /// Intermediate counters.
    Progress(SelectCounters),
    /// Keep-alive sent while the query produces no records.
    Continuation,
    /// The query finished; nothing follows.
    End,
}

/// Ordered events of a select response.
pub struct SelectEvents {
    receiver: EventReceiver<types::SelectObjectContentEventStream, SelectObjectContentEventStreamError>,
}

impl From<operation::select_object_content::SelectObjectContentOutput> for SelectEvents {
    fn from(output: operation::select_object_content::SelectObjectContentOutput) -> Self {
        Self {
            receiver: output.payload,
        }
    }
}

impl SelectEvents {
    /// Next event, or `None` once the stream is over.
    ///
    /// An error event sent by the service is logged and ends the stream.
    pub async fn next(&mut self) -> Result<Option<SelectEvent>> {
        loop {
            let Some(Some(event)) = self.receiver.recv().await.or_logged("select_object_content")?
            else {
                return Ok(None);
            };
            let event = match event {
                types::SelectObjectContentEventStream::Records(records) => SelectEvent::Records(
                    records
                        .payload()
                        .map(|payload| payload.as_ref().to_vec())
                        .unwrap_or_default(),
                ),
                types::SelectObjectContentEventStream::Stats(stats) => {
                    SelectEvent::Stats(stats.details().map(Into::into).unwrap_or_default())
                }
                types::SelectObjectContentEventStream::Progress(progress) => {
                    SelectEvent::Progress(progress.details().map(Into::into).unwrap_or_default())
                }
                types::SelectObjectContentEventStream::Cont(_) => SelectEvent::Continuation,
                types::SelectObjectContentEventStream::End(_) => SelectEvent::End,
                other => {
                    tracing::debug!(event = ?other, "skipping unknown select event");
                    continue;
                }
            };
            return Ok(Some(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::csv_with_header(
        SelectObject {
            bucket: "movies".to_string(),
            expression: "SELECT s.Title FROM S3Object s".to_string(),
            key: "deniro.csv".to_string(),
            ..Default::default()
        },
        SelectObjectInput {
            bucket: "movies".to_string(),
            expression: "SELECT s.Title FROM S3Object s".to_string(),
            input_serialization: types::InputSerialization::builder()
                .csv(
                    types::CsvInput::builder()
                        .file_header_info(types::FileHeaderInfo::Use)
                        .build()
                )
                .build(),
            key: "deniro.csv".to_string(),
            output_serialization: types::OutputSerialization::builder()
                .json(types::JsonOutput::builder().build())
                .build(),
        }
    )]
    #[case::csv_without_header(
        SelectObject {
            bucket: "movies".to_string(),
            expression: "SELECT * FROM S3Object".to_string(),
            input: InputFormat::Csv(HeaderRow::Absent),
            key: "deniro.csv".to_string(),
            output: OutputFormat::Csv,
        },
        SelectObjectInput {
            bucket: "movies".to_string(),
            expression: "SELECT * FROM S3Object".to_string(),
            input_serialization: types::InputSerialization::builder()
                .csv(
                    types::CsvInput::builder()
                        .file_header_info(types::FileHeaderInfo::None)
                        .build()
                )
                .build(),
            key: "deniro.csv".to_string(),
            output_serialization: types::OutputSerialization::builder()
                .csv(types::CsvOutput::builder().build())
                .build(),
        }
    )]
    #[case::json_lines(
        SelectObject {
            bucket: "logs".to_string(),
            expression: "SELECT s.level FROM S3Object s".to_string(),
            input: InputFormat::JsonLines,
            key: "app.jsonl".to_string(),
            output: OutputFormat::Json,
        },
        SelectObjectInput {
            bucket: "logs".to_string(),
            expression: "SELECT s.level FROM S3Object s".to_string(),
            input_serialization: types::InputSerialization::builder()
                .json(types::JsonInput::builder().r#type(types::JsonType::Lines).build())
                .build(),
            key: "app.jsonl".to_string(),
            output_serialization: types::OutputSerialization::builder()
                .json(types::JsonOutput::builder().build())
                .build(),
        }
    )]
    fn test_select_object(#[case] args: SelectObject, #[case] expected: SelectObjectInput) {
        let actual: SelectObjectInput = args.into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_counters_from_stats() {
        let stats = types::Stats::builder()
            .bytes_scanned(100)
            .bytes_processed(100)
            .bytes_returned(12)
            .build();
        assert_eq!(
            SelectCounters::from(&stats),
            SelectCounters {
                bytes_scanned: Some(100),
                bytes_processed: Some(100),
                bytes_returned: Some(12),
            }
        );
    }
}
