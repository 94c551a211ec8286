use crate::common;

use std::collections;

/// Attributes to return (projection expression).
///
/// ```rust
/// use cloud_crud::common::selection;
///
/// let selection = selection::Selection::from(["model", "brand", "price"]);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection(pub Vec<String>);

impl<S: Into<String>, const N: usize> From<[S; N]> for Selection {
    fn from(names: [S; N]) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl From<Selection> for common::ExpressionInput {
    fn from(selection: Selection) -> Self {
        let operations = selection
            .0
            .into_iter()
            .map(|name| {
                let placeholder = common::placeholder(&name);
                common::ExpressionInput {
                    expression: placeholder.clone(),
                    expression_attribute_names: collections::HashMap::from([(placeholder, name)]),
                    ..Default::default()
                }
            })
            .collect();
        common::ExpressionInput::merge(", ", operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::single(
        Selection::from(["a"]),
        common::ExpressionInput {
            expression: "#a".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                ]
            ),
            ..Default::default()
        }
    )]
    #[case::multiple(
        Selection::from(["model", "brand", "price"]),
        common::ExpressionInput {
            expression: "#model, #brand, #price".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#model".to_string(), "model".to_string()),
                    ("#brand".to_string(), "brand".to_string()),
                    ("#price".to_string(), "price".to_string()),
                ]
            ),
            ..Default::default()
        }
    )]
    #[case::empty(
        Selection::default(),
        common::ExpressionInput::default()
    )]
    fn test_selection_to_expression_input(
        #[case] selection: Selection,
        #[case] expected: common::ExpressionInput,
    ) {
        let actual: common::ExpressionInput = selection.into();
        assert_eq!(actual, expected);
    }
}
