//! Query builder for PostgREST-style table listings.

/// Sort direction and column for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A filtered, ordered, limited table listing.
///
/// Rendered as query parameters: `select=*`, one `{column}=eq.{value}` per
/// filter, `order={column}.{asc|desc}` and `limit={n}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<Order>,
    limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only return rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Order rows by `column`.
    pub fn order(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            descending,
        });
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn row_limit(&self) -> Option<u32> {
        self.limit
    }

    /// Render as URL query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(query: &Query) -> Vec<(String, String)> {
        query.to_params()
    }

    #[test]
    fn test_empty_query_selects_everything() {
        assert_eq!(
            pairs(&Query::new()),
            vec![("select".to_string(), "*".to_string())]
        );
    }

    #[test]
    fn test_full_query_params() {
        let query = Query::new()
            .eq("category", "science")
            .order("votesInteresting", true)
            .limit(1000);

        assert_eq!(
            pairs(&query),
            vec![
                ("select".to_string(), "*".to_string()),
                ("category".to_string(), "eq.science".to_string()),
                ("order".to_string(), "votesInteresting.desc".to_string()),
                ("limit".to_string(), "1000".to_string()),
            ]
        );
    }

    #[test]
    fn test_ascending_order() {
        let query = Query::new().order("id", false);
        assert_eq!(query.to_params()[1].1, "id.asc");
        assert_eq!(query.ordering().map(|o| o.descending), Some(false));
    }
}
