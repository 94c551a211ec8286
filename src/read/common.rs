use crate::common::{self, value::Record};

use aws_sdk_dynamodb::types;
use std::collections;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for single-item read operations (GetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve (projection expression).
    ///
    /// If `None`, all attributes are retrieved.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        let (expression_attribute_names, projection_expression) = match single_read_args.selection {
            Some(selection) => {
                let selection_operation: common::ExpressionInput = selection.into();
                (
                    Some(selection_operation.expression_attribute_names),
                    Some(selection_operation.expression),
                )
            }
            None => (None, None),
        };
        Self {
            consistent_read: single_read_args.consistent_read,
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// Not supported on global secondary indexes.
    pub consistent_read: Option<bool>,
    /// Key attributes to resume from, as returned in `LastEvaluatedKey`.
    ///
    /// Pages after this one are still followed until the result set is exhausted.
    pub exclusive_start_key: Option<Record>,
    /// Attribute filter applied to the items read.
    ///
    /// Filtering happens after the read: it reduces what is returned, not what is
    /// evaluated or billed.
    pub filter: Option<common::condition::Filter>,
    /// The name of a global or local secondary index to read instead of the base table.
    pub index_name: Option<String>,
    /// Maximum number of items evaluated per page.
    pub limit: Option<i32>,
    /// Which attributes to retrieve (projection expression).
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<MultipleReadArgs> for MultipleReadInput {
    fn from(multiple_read_args: MultipleReadArgs) -> Self {
        let exclusive_start_key = multiple_read_args
            .exclusive_start_key
            .map(collections::HashMap::from);
        let filter_operation: Option<common::ExpressionInput> =
            multiple_read_args.filter.map(Into::into);
        let selection_operation: Option<common::ExpressionInput> =
            multiple_read_args.selection.map(Into::into);
        let (
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            projection_expression,
        ) = match (filter_operation, selection_operation) {
            (Some(mut filter_operation), Some(selection_operation)) => {
                filter_operation
                    .expression_attribute_names
                    .extend(selection_operation.expression_attribute_names);
                (
                    Some(filter_operation.expression_attribute_names),
                    Some(filter_operation.expression_attribute_values),
                    Some(filter_operation.expression),
                    Some(selection_operation.expression),
                )
            }
            (Some(filter_operation), None) => (
                Some(filter_operation.expression_attribute_names),
                Some(filter_operation.expression_attribute_values),
                Some(filter_operation.expression),
                None,
            ),
            (None, Some(selection_operation)) => (
                Some(selection_operation.expression_attribute_names),
                None,
                None,
                Some(selection_operation.expression),
            ),
            (None, None) => (None, None, None, None),
        };
        Self {
            consistent_read: multiple_read_args.consistent_read,
            exclusive_start_key,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: multiple_read_args.index_name,
            limit: multiple_read_args.limit,
            projection_expression,
            table_name: multiple_read_args.table_name,
        }
    }
}

/// get paginated output
#[macro_export]
macro_rules! get_paginated_output {
    ($paginator:expr, $output_type:ty) => {{
        let mut outputs = Vec::new();
        while let Some(page) = $paginator.next().await {
            outputs.push(page?);
        }
        let (items, count, scanned, capacities) = outputs.into_iter().fold(
            (Vec::new(), 0, 0, Vec::new()),
            |(mut items, count, scanned, mut caps), output| {
                if let Some(other_items) = output.items {
                    items.extend(other_items);
                }
                if let Some(cap) = output.consumed_capacity {
                    caps.push(cap);
                }
                (
                    items,
                    count + output.count,
                    scanned + output.scanned_count,
                    caps,
                )
            },
        );
        let aggregated_capacity = $crate::read::common::aggregate_capacity(capacities);
        let output = <$output_type>::builder()
            .set_items(Some(items))
            .set_count(Some(count))
            .set_scanned_count(Some(scanned))
            .set_consumed_capacity(aggregated_capacity)
            .build();
        Ok(output)
    }};
}

/// Sum consumed capacity across pages; `None` when no page reported any.
pub(crate) fn aggregate_capacity(
    capacities: Vec<types::ConsumedCapacity>,
) -> Option<types::ConsumedCapacity> {
    if capacities.is_empty() {
        return None;
    }
    let (cap, read, write, table) = capacities.into_iter().fold(
        (0.0, 0.0, 0.0, None),
        |(cap, read, write, table), capacity| {
            (
                cap + capacity.capacity_units.unwrap_or(0.0),
                read + capacity.read_capacity_units.unwrap_or(0.0),
                write + capacity.write_capacity_units.unwrap_or(0.0),
                table.or(capacity.table_name),
            )
        },
    );
    let capacity = types::ConsumedCapacity::builder()
        .set_table_name(table)
        .set_capacity_units(Some(cap))
        .set_read_capacity_units(Some(read))
        .set_write_capacity_units(Some(write))
        .build();
    Some(capacity)
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .table_name($multiple_read_operation.table_name)
    };
}
