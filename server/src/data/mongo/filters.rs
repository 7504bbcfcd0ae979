//! Search filter descriptors and their translation to query clauses
//!
//! Callers describe predicates as `(field, operator, values)` triples with
//! string-typed values straight off the wire. `apply_filters` turns each
//! value into one clause on a [`QueryBuilder`]; clauses combine as AND, so a
//! multi-value IN filter is an intersection, not a union.

use bson::Bson;

use super::query::QueryBuilder;

/// Recognized filter operators
///
/// Closed set. Operator strings that do not map to a variant are dropped
/// during translation, matching the permissive contract clients rely on:
/// an unknown filter narrows nothing rather than failing the whole search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact equality
    Eq,
    /// Strictly greater than
    Gt,
    /// Strictly less than
    Lt,
    /// Greater than or equal
    Gte,
    /// Less than or equal
    Lte,
    /// Some array element matches the value as a case-insensitive pattern
    In,
    /// No array element matches the value as a case-insensitive pattern
    Nin,
}

impl FilterOperator {
    /// Parse the wire-format operator token; `None` for unrecognized tokens
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EQ" => Some(Self::Eq),
            "GT" => Some(Self::Gt),
            "LT" => Some(Self::Lt),
            "GTE" => Some(Self::Gte),
            "LTE" => Some(Self::Lte),
            "IN" => Some(Self::In),
            "NIN" => Some(Self::Nin),
            _ => None,
        }
    }
}

/// One predicate descriptor contributed by a caller to narrow a search
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            values,
        }
    }

    /// Advisory completeness check: field, operator, and values all present
    ///
    /// Does not check that `operator` is recognized or that `field` names a
    /// real attribute, and is never consulted by [`apply_filters`]. Callers
    /// may pass filters that fail this check; translation still attempts
    /// them.
    pub fn is_valid(&self) -> bool {
        !self.field.is_empty() && !self.operator.is_empty() && !self.values.is_empty()
    }
}

/// Coerce a wire-format string value into the closest-fitting BSON value
///
/// Stored documents hold numbers and booleans in their native types, so a
/// comparison like `difficulty <= "3"` only matches if the value is sent to
/// the server as a number. Integers are preferred over doubles so that
/// equality against integer-typed fields behaves as expected.
fn coerce_value(value: &str) -> Bson {
    if let Ok(n) = value.parse::<i64>() {
        return Bson::Int64(n);
    }
    if let Ok(f) = value.parse::<f64>() {
        return Bson::Double(f);
    }
    if let Ok(b) = value.parse::<bool>() {
        return Bson::Boolean(b);
    }
    Bson::String(value.to_string())
}

/// Translate filters into query clauses on `builder`
///
/// Emits one clause per value, in input order, for each filter whose
/// operator is recognized. Unrecognized operators contribute zero clauses
/// and processing continues with the next filter. Never executes a query
/// and never fails: semantically invalid combinations (a malformed field
/// path, a non-numeric value compared with GT) surface later as a
/// database-layer error when the caller runs the query.
pub fn apply_filters(builder: &mut QueryBuilder, filters: &[Filter]) {
    for filter in filters {
        let Some(operator) = FilterOperator::parse(&filter.operator) else {
            continue;
        };
        for value in &filter.values {
            match operator {
                FilterOperator::Eq => builder.where_equals(&filter.field, coerce_value(value)),
                FilterOperator::Gt => {
                    builder.where_greater_than(&filter.field, coerce_value(value))
                }
                FilterOperator::Lt => builder.where_less_than(&filter.field, coerce_value(value)),
                FilterOperator::Gte => {
                    builder.where_greater_or_equal(&filter.field, coerce_value(value))
                }
                FilterOperator::Lte => {
                    builder.where_less_or_equal(&filter.field, coerce_value(value))
                }
                FilterOperator::In => builder.where_array_element_matches(&filter.field, value),
                FilterOperator::Nin => {
                    builder.where_no_array_element_matches(&filter.field, value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn apply(filters: &[Filter]) -> QueryBuilder {
        let mut builder = QueryBuilder::new();
        apply_filters(&mut builder, filters);
        builder
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(FilterOperator::parse("EQ"), Some(FilterOperator::Eq));
        assert_eq!(FilterOperator::parse("GT"), Some(FilterOperator::Gt));
        assert_eq!(FilterOperator::parse("LT"), Some(FilterOperator::Lt));
        assert_eq!(FilterOperator::parse("GTE"), Some(FilterOperator::Gte));
        assert_eq!(FilterOperator::parse("LTE"), Some(FilterOperator::Lte));
        assert_eq!(FilterOperator::parse("IN"), Some(FilterOperator::In));
        assert_eq!(FilterOperator::parse("NIN"), Some(FilterOperator::Nin));
        assert_eq!(FilterOperator::parse("NEQ"), None);
        assert_eq!(FilterOperator::parse("eq"), None);
        assert_eq!(FilterOperator::parse(""), None);
    }

    #[test]
    fn test_comparison_operators_emit_one_clause_each() {
        let cases = [
            ("EQ", doc! { "difficulty": 3_i64 }),
            ("GT", doc! { "difficulty": { "$gt": 3_i64 } }),
            ("LT", doc! { "difficulty": { "$lt": 3_i64 } }),
            ("GTE", doc! { "difficulty": { "$gte": 3_i64 } }),
            ("LTE", doc! { "difficulty": { "$lte": 3_i64 } }),
        ];
        for (op, expected) in cases {
            let builder = apply(&[Filter::new("difficulty", op, vec!["3".into()])]);
            assert_eq!(builder.len(), 1, "operator {op}");
            assert_eq!(builder.clauses()[0], expected, "operator {op}");
        }
    }

    #[test]
    fn test_one_clause_per_value_in_input_order() {
        let builder = apply(&[Filter::new(
            "tags",
            "IN",
            vec!["spicy".into(), "vegan".into(), "quick".into()],
        )]);
        assert_eq!(builder.len(), 3);
        for (clause, pattern) in builder.clauses().iter().zip(["spicy", "vegan", "quick"]) {
            assert_eq!(
                *clause,
                doc! { "tags": { "$elemMatch": { "$regex": pattern, "$options": "i" } } }
            );
        }
    }

    #[test]
    fn test_in_clause_is_case_insensitive_pattern() {
        let builder = apply(&[Filter::new("ingredients", "IN", vec!["chicken".into()])]);
        let clause = &builder.clauses()[0];
        let elem = clause
            .get_document("ingredients")
            .unwrap()
            .get_document("$elemMatch")
            .unwrap();
        assert_eq!(elem.get_str("$regex").unwrap(), "chicken");
        assert_eq!(elem.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_nin_negates_the_existential_match() {
        let builder = apply(&[Filter::new("ingredients", "NIN", vec!["beef".into()])]);
        assert_eq!(
            builder.clauses()[0],
            doc! { "ingredients": {
                "$not": { "$elemMatch": { "$regex": "beef", "$options": "i" } }
            }}
        );
    }

    #[test]
    fn test_unrecognized_operator_skipped_silently() {
        let builder = apply(&[
            Filter::new("difficulty", "NEQ", vec!["3".into()]),
            Filter::new("servings", "GTE", vec!["2".into()]),
        ]);
        // The NEQ filter contributes nothing; the GTE filter still applies.
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.clauses()[0], doc! { "servings": { "$gte": 2_i64 } });
    }

    #[test]
    fn test_is_valid_requires_all_three_parts() {
        assert!(Filter::new("name", "EQ", vec!["x".into()]).is_valid());
        assert!(!Filter::new("", "EQ", vec!["x".into()]).is_valid());
        assert!(!Filter::new("name", "", vec!["x".into()]).is_valid());
        assert!(!Filter::new("name", "EQ", vec![]).is_valid());
    }

    #[test]
    fn test_is_valid_does_not_check_operator_recognition() {
        assert!(Filter::new("name", "NEQ", vec!["x".into()]).is_valid());
    }

    #[test]
    fn test_multi_value_in_renders_as_intersection() {
        let builder = apply(&[Filter::new(
            "tags",
            "IN",
            vec!["spicy".into(), "vegan".into()],
        )]);
        let filter = builder.into_filter();
        let and = filter.get_array("$and").unwrap();
        assert_eq!(and.len(), 2);
    }

    #[test]
    fn test_mixed_comparison_filters_combine() {
        let builder = apply(&[
            Filter::new("difficulty", "LTE", vec!["3".into()]),
            Filter::new("servings", "GTE", vec!["2".into()]),
        ]);
        let filter = builder.into_filter();
        assert_eq!(
            filter,
            doc! { "$and": [
                { "difficulty": { "$lte": 3_i64 } },
                { "servings": { "$gte": 2_i64 } },
            ]}
        );
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(coerce_value("3"), Bson::Int64(3));
        assert_eq!(coerce_value("-7"), Bson::Int64(-7));
        assert_eq!(coerce_value("2.5"), Bson::Double(2.5));
        assert_eq!(coerce_value("true"), Bson::Boolean(true));
        assert_eq!(coerce_value("false"), Bson::Boolean(false));
        assert_eq!(coerce_value("chicken"), Bson::String("chicken".into()));
    }

    #[test]
    fn test_empty_filters_emit_nothing() {
        let builder = apply(&[]);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_filter_with_no_values_emits_nothing() {
        let builder = apply(&[Filter::new("tags", "IN", vec![])]);
        assert!(builder.is_empty());
    }
}
