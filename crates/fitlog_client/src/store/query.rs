//! Collection queries: equality / range filters, ordering and a result limit.

use super::value::Value;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOp {
    Equal,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// A query over one collection. All filters must match (logical AND).
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<FieldFilter>,
    pub order_by: Vec<Order>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Equal, value)
    }

    /// Restrict `field` to the inclusive range `[start, end]`.
    pub fn where_between(
        self,
        field: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        self.filter(field, FilterOp::GreaterThanOrEqual, start)
            .filter(field, FilterOp::LessThanOrEqual, end)
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(Order {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn order_by_desc(self, field: &str) -> Self {
        self.order_by(field, Direction::Descending)
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `structuredQuery` body of a Firestore `runQuery` request.
    pub(crate) fn to_structured_query(&self) -> StructuredQuery<'_> {
        let mut filters: Vec<WireFilter<'_>> = self
            .filters
            .iter()
            .map(|f| WireFilter::FieldFilter {
                field: FieldReference { field_path: &f.field },
                op: f.op,
                value: &f.value,
            })
            .collect();
        let filter = match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(WireFilter::CompositeFilter {
                op: "AND",
                filters,
            }),
        };
        StructuredQuery {
            from: vec![CollectionSelector {
                collection_id: &self.collection,
            }],
            filter,
            order_by: self
                .order_by
                .iter()
                .map(|o| WireOrder {
                    field: FieldReference { field_path: &o.field },
                    direction: o.direction,
                })
                .collect(),
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery<'a> {
    from: Vec<CollectionSelector<'a>>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<WireFilter<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<WireOrder<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector<'a> {
    collection_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference<'a> {
    field_path: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireFilter<'a> {
    #[serde(rename_all = "camelCase")]
    FieldFilter {
        field: FieldReference<'a>,
        op: FilterOp,
        value: &'a Value,
    },
    CompositeFilter {
        op: &'static str,
        filters: Vec<WireFilter<'a>>,
    },
}

#[derive(Debug, Serialize)]
struct WireOrder<'a> {
    field: FieldReference<'a>,
    direction: Direction,
}
