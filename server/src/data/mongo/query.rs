//! Incremental MongoDB filter document builder
//!
//! Accumulates predicate clauses one at a time and renders them as a single
//! filter document. Every appended clause narrows the result set: the final
//! document combines all clauses with `$and`, so two clauses against the same
//! field are an intersection, never a union.

use bson::{Bson, Document, doc, oid::ObjectId};

/// Mutable accumulator of query clauses
#[derive(Debug, Default)]
pub struct QueryBuilder {
    clauses: Vec<Document>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw clause document
    pub fn push(&mut self, clause: Document) {
        self.clauses.push(clause);
    }

    /// `field == value`
    pub fn where_equals(&mut self, field: &str, value: Bson) {
        self.push(doc! { field: value });
    }

    /// `field > value`
    pub fn where_greater_than(&mut self, field: &str, value: Bson) {
        self.push(doc! { field: { "$gt": value } });
    }

    /// `field < value`
    pub fn where_less_than(&mut self, field: &str, value: Bson) {
        self.push(doc! { field: { "$lt": value } });
    }

    /// `field >= value`
    pub fn where_greater_or_equal(&mut self, field: &str, value: Bson) {
        self.push(doc! { field: { "$gte": value } });
    }

    /// `field <= value`
    pub fn where_less_or_equal(&mut self, field: &str, value: Bson) {
        self.push(doc! { field: { "$lte": value } });
    }

    /// Some element of the array `field` matches `pattern`, case-insensitively
    pub fn where_array_element_matches(&mut self, field: &str, pattern: &str) {
        self.push(doc! {
            field: { "$elemMatch": { "$regex": pattern, "$options": "i" } }
        });
    }

    /// No element of the array `field` matches `pattern`, case-insensitively
    pub fn where_no_array_element_matches(&mut self, field: &str, pattern: &str) {
        self.push(doc! {
            field: { "$not": { "$elemMatch": { "$regex": pattern, "$options": "i" } } }
        });
    }

    /// `_id` is one of the given ids
    pub fn where_id_in(&mut self, ids: &[ObjectId]) {
        self.push(doc! { "_id": { "$in": ids.to_vec() } });
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Access the accumulated clauses in append order
    pub fn clauses(&self) -> &[Document] {
        &self.clauses
    }

    /// Render the accumulated clauses as a MongoDB filter document
    ///
    /// Zero clauses renders an empty (match-all) document. A single clause is
    /// emitted as-is. Multiple clauses are wrapped in `$and` so repeated
    /// predicates on the same field all apply.
    pub fn into_filter(self) -> Document {
        let mut clauses = self.clauses;
        match clauses.len() {
            0 => Document::new(),
            1 => clauses.remove(0),
            _ => doc! { "$and": clauses },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_matches_all() {
        let builder = QueryBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.into_filter(), Document::new());
    }

    #[test]
    fn test_single_clause_not_wrapped() {
        let mut builder = QueryBuilder::new();
        builder.where_equals("system", Bson::String("us".into()));
        assert_eq!(builder.into_filter(), doc! { "system": "us" });
    }

    #[test]
    fn test_multiple_clauses_combined_with_and() {
        let mut builder = QueryBuilder::new();
        builder.where_greater_or_equal("servings", Bson::Int64(2));
        builder.where_less_or_equal("difficulty", Bson::Int64(3));
        let filter = builder.into_filter();
        assert_eq!(
            filter,
            doc! { "$and": [
                { "servings": { "$gte": 2_i64 } },
                { "difficulty": { "$lte": 3_i64 } },
            ]}
        );
    }

    #[test]
    fn test_repeated_field_clauses_intersect() {
        // Two predicates on the same field must both survive rendering.
        let mut builder = QueryBuilder::new();
        builder.where_array_element_matches("tags", "spicy");
        builder.where_array_element_matches("tags", "vegan");
        let filter = builder.into_filter();
        let and = filter.get_array("$and").unwrap();
        assert_eq!(and.len(), 2);
    }

    #[test]
    fn test_elem_match_shape() {
        let mut builder = QueryBuilder::new();
        builder.where_array_element_matches("ingredients", "chicken");
        assert_eq!(
            builder.into_filter(),
            doc! { "ingredients": { "$elemMatch": { "$regex": "chicken", "$options": "i" } } }
        );
    }

    #[test]
    fn test_negated_elem_match_shape() {
        let mut builder = QueryBuilder::new();
        builder.where_no_array_element_matches("ingredients", "beef");
        assert_eq!(
            builder.into_filter(),
            doc! { "ingredients": {
                "$not": { "$elemMatch": { "$regex": "beef", "$options": "i" } }
            }}
        );
    }

    #[test]
    fn test_id_scoping() {
        let ids = vec![ObjectId::new(), ObjectId::new()];
        let mut builder = QueryBuilder::new();
        builder.where_id_in(&ids);
        let filter = builder.into_filter();
        let in_list = filter
            .get_document("_id")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(in_list.len(), 2);
    }
}
