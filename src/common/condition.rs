use crate::common::{self, value::Value};

use aws_sdk_dynamodb::types;
use std::{collections, ops};

/// Logical operator for combining conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicalOperator {
    /// Logical AND - all conditions must be true.
    And,
    /// Logical OR - at least one condition must be true.
    Or,
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// The predicate kinds a key condition or filter can express.
///
/// This is a closed set, not an expression language: each kind maps to exactly one
/// expression template.
///
/// ```rust
/// use cloud_crud::common::{condition, value::Number};
///
/// let eq = condition::Condition::Equals("DogTreat".into());
/// let range = condition::Condition::Between(
///     Number::from(1u8).into(),
///     Number::from(2u8).into(),
/// );
/// let prefix = condition::Condition::BeginsWith("dt".to_string());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// `begins_with(attribute, prefix)` (string attributes only).
    BeginsWith(String),
    /// `attribute BETWEEN low AND high`, both bounds inclusive.
    Between(Value, Value),
    /// `attribute = value`.
    Equals(Value),
}

impl Condition {
    fn get_expression(
        self,
        key: &str,
        key_placeholder: &str,
        index: &mut usize,
    ) -> (String, collections::HashMap<String, types::AttributeValue>) {
        let mut expression_attribute_values = collections::HashMap::new();
        let expression = match self {
            Self::BeginsWith(prefix) => {
                let value_placeholder = format!(":{key}_begins_with{index}");
                *index += 1;
                let expression = format!("begins_with({key_placeholder}, {value_placeholder})");
                expression_attribute_values
                    .insert(value_placeholder, types::AttributeValue::S(prefix));
                expression
            }
            Self::Between(low, high) => {
                let low_placeholder = format!(":{key}_between{index}");
                *index += 1;
                let high_placeholder = format!(":{key}_between{index}");
                *index += 1;
                let expression =
                    format!("{key_placeholder} BETWEEN {low_placeholder} AND {high_placeholder}");
                expression_attribute_values.insert(low_placeholder, low.into());
                expression_attribute_values.insert(high_placeholder, high.into());
                expression
            }
            Self::Equals(value) => {
                let value_placeholder = format!(":{key}_eq{index}");
                *index += 1;
                let expression = format!("{key_placeholder} = {value_placeholder}");
                expression_attribute_values.insert(value_placeholder, value.into());
                expression
            }
        };
        (expression, expression_attribute_values)
    }
}

/// Condition applied to an attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition {
    /// The condition to apply to the attribute.
    pub condition: Condition,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl KeyCondition {
    /// Condition on the named attribute.
    pub fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            condition,
            name: name.into(),
        }
    }

    pub(crate) fn get_expression_operation(
        keys: Vec<Self>,
        operator: &LogicalOperator,
        index: &mut usize,
    ) -> common::ExpressionInput {
        let mut expressions = Vec::with_capacity(keys.len());
        let mut expression_attribute_names = collections::HashMap::with_capacity(keys.len());
        let mut expression_attribute_values = collections::HashMap::new();
        for key in keys {
            let placeholder = common::placeholder(&key.name);
            let (expression, condition_expression_attribute_values) =
                key.condition.get_expression(&key.name, &placeholder, index);
            expressions.push(expression);
            expression_attribute_names.insert(placeholder, key.name);
            expression_attribute_values.extend(condition_expression_attribute_values);
        }
        common::ExpressionInput {
            expression: expressions.join(&**operator),
            expression_attribute_names,
            expression_attribute_values,
        }
    }
}

/// Attribute filter applied after items are read (query) or to every item (scan).
///
/// ```rust
/// use cloud_crud::common::condition;
///
/// let filter = condition::Filter {
///     operator: condition::LogicalOperator::And,
///     conditions: vec![condition::KeyCondition::new(
///         "pk",
///         condition::Condition::BeginsWith("dt".to_string()),
///     )],
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// How the conditions are combined.
    pub operator: LogicalOperator,
    /// Conditions on individual attributes.
    pub conditions: Vec<KeyCondition>,
}

impl Filter {
    /// Filter made of a single condition.
    pub fn single(condition: KeyCondition) -> Self {
        Self {
            operator: LogicalOperator::And,
            conditions: vec![condition],
        }
    }
}

impl From<Filter> for common::ExpressionInput {
    fn from(filter: Filter) -> Self {
        let is_composite = filter.conditions.len() > 1;
        let mut operation =
            KeyCondition::get_expression_operation(filter.conditions, &filter.operator, &mut 0);
        if is_composite {
            operation.expression = format!("({})", operation.expression);
        }
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::Number;

    use rstest::rstest;

    #[rstest]
    #[case::equals(
        Filter::single(
            KeyCondition::new("pk", Condition::Equals("dt1".into()))
        ),
        common::ExpressionInput {
            expression: "#pk = :pk_eq0".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#pk".to_string(), "pk".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":pk_eq0".to_string(), types::AttributeValue::S("dt1".to_string())),
                ]
            ),
        }
    )]
    #[case::begins_with(
        Filter::single(
            KeyCondition::new("pk", Condition::BeginsWith("dt".to_string()))
        ),
        common::ExpressionInput {
            expression: "begins_with(#pk, :pk_begins_with0)".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#pk".to_string(), "pk".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":pk_begins_with0".to_string(), types::AttributeValue::S("dt".to_string())),
                ]
            ),
        }
    )]
    #[case::between_or_equals(
        Filter {
            operator: LogicalOperator::Or,
            conditions: vec![
                KeyCondition::new(
                    "price",
                    Condition::Between(
                        Number::from(1u8).into(),
                        Number::from(10u8).into(),
                    ),
                ),
                KeyCondition::new("brand", Condition::Equals("c".into())),
            ],
        },
        common::ExpressionInput {
            expression: "(#price BETWEEN :price_between0 AND :price_between1 OR #brand = :brand_eq2)".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#price".to_string(), "price".to_string()),
                    ("#brand".to_string(), "brand".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (":price_between0".to_string(), types::AttributeValue::N("1".to_string())),
                    (":price_between1".to_string(), types::AttributeValue::N("10".to_string())),
                    (":brand_eq2".to_string(), types::AttributeValue::S("c".to_string())),
                ]
            ),
        }
    )]
    fn test_filter_to_expression_input(
        #[case] filter: Filter,
        #[case] expected: common::ExpressionInput,
    ) {
        let actual: common::ExpressionInput = filter.into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_key_conditions_share_index() {
        let mut index = 0;
        let operation = KeyCondition::get_expression_operation(
            vec![
                KeyCondition::new("sk", Condition::Equals("guitar".into())),
                KeyCondition::new("pk", Condition::BeginsWith("g".to_string())),
            ],
            &LogicalOperator::And,
            &mut index,
        );
        assert_eq!(
            operation.expression,
            "#sk = :sk_eq0 AND begins_with(#pk, :pk_begins_with1)"
        );
        assert_eq!(index, 2);
    }
}
