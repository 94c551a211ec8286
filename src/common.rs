//! Building blocks of item requests.
//!
//! Values and records model what is stored; keys, conditions and selections compile into
//! the expression strings and placeholder maps the requests carry.

/// Key and filter conditions.
pub mod condition;

/// Primary keys.
pub mod key;

/// Projections.
pub mod selection;

/// Tagged attribute values, decimal numbers and records.
pub mod value;

use aws_sdk_dynamodb::types;
use std::collections;

pub(crate) fn placeholder(name: &str) -> String {
    format!("#{name}")
}

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// Expression text with the placeholders it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        match names {
            Some(existing) => existing.extend(self.expression_attribute_names),
            None => *names = Some(self.expression_attribute_names),
        }
        if !self.expression_attribute_values.is_empty() {
            match values {
                Some(existing) => existing.extend(self.expression_attribute_values),
                None => *values = Some(self.expression_attribute_values),
            }
        }
        self.expression
    }
}

/// Request fragments shared by the operation tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::HashMap;

    pub(crate) fn names(names: &[&str]) -> Option<HashMap<String, String>> {
        Some(
            names
                .iter()
                .map(|name| (format!("#{name}"), name.to_string()))
                .collect(),
        )
    }

    pub(crate) fn values<const N: usize>(
        values: [(&str, AttributeValue); N],
    ) -> Option<HashMap<String, AttributeValue>> {
        Some(
            values
                .into_iter()
                .map(|(placeholder, value)| (placeholder.to_string(), value))
                .collect(),
        )
    }

    pub(crate) fn s(text: &str) -> AttributeValue {
        AttributeValue::S(text.to_string())
    }

    pub(crate) fn n(text: &str) -> AttributeValue {
        AttributeValue::N(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_skips_empty_expressions() {
        let merged = ExpressionInput::merge(
            " AND ",
            vec![
                ExpressionInput {
                    expression: "#a = :a_eq0".to_string(),
                    expression_attribute_names: collections::HashMap::from([(
                        "#a".to_string(),
                        "a".to_string(),
                    )]),
                    ..Default::default()
                },
                ExpressionInput::default(),
                ExpressionInput {
                    expression: "#b = :b_eq1".to_string(),
                    ..Default::default()
                },
            ],
        );
        assert_eq!(merged.expression, "#a = :a_eq0 AND #b = :b_eq1");
        assert_eq!(merged.expression_attribute_names.len(), 1);
    }

    #[test]
    fn test_merge_into_leaves_values_unset_when_empty() {
        let mut names = None;
        let mut values = None;
        let expression = ExpressionInput {
            expression: "#a".to_string(),
            expression_attribute_names: collections::HashMap::from([(
                "#a".to_string(),
                "a".to_string(),
            )]),
            ..Default::default()
        }
        .merge_into(&mut names, &mut values);
        assert_eq!(expression, "#a");
        assert_eq!(
            names,
            Some(collections::HashMap::from([(
                "#a".to_string(),
                "a".to_string()
            )]))
        );
        assert_eq!(values, None);
    }
}
