//! Query-string encoding for list endpoints.
//!
//! The vendor uses PHP-style bracketed keys: `filter[id]`,
//! `filter[updated_at][from]`, `filter[entity][]`, `order[created_at]`.
//! Keys and values are percent-encoded, and pairs keep insertion order so
//! generated URLs are stable.

use std::fmt;

pub const DEFAULT_LIMIT: u32 = 250;
pub const DEFAULT_PAGE: u32 = 1;

/// Ordered list of query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn extend(&mut self, other: &Query) -> &mut Self {
        self.pairs.extend(other.pairs.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path` with `?<encoded>` appended, or `path` alone when empty.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}

/// Sort direction for `order[<field>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// `filter[...]` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    query: Query,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filter[<field>]=<value>`. A field named `<name>__from` or
    /// `<name>__to` becomes `filter[<name>][from]` / `filter[<name>][to]`.
    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        let key = match (field.strip_suffix("__from"), field.strip_suffix("__to")) {
            (Some(name), _) => format!("filter[{name}][from]"),
            (_, Some(name)) => format!("filter[{name}][to]"),
            _ => format!("filter[{field}]"),
        };
        self.query.push(key, value);
        self
    }

    pub fn from(mut self, field: &str, value: impl ToString) -> Self {
        self.query.push(format!("filter[{field}][from]"), value);
        self
    }

    pub fn to(mut self, field: &str, value: impl ToString) -> Self {
        self.query.push(format!("filter[{field}][to]"), value);
        self
    }

    /// `filter[<field>][]=<v>` repeated for each value.
    pub fn any<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.query.push(format!("filter[{field}][]"), value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn to_query(&self) -> Query {
        self.query.clone()
    }
}

/// Pagination, `with` expansion, filters and ordering for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub limit: u32,
    pub page: u32,
    with: Vec<String>,
    filter: Filter,
    order: Vec<(String, SortOrder)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
            with: Vec::new(),
            filter: Filter::new(),
            order: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with(mut self, relation: impl Into<String>) -> Self {
        self.with.push(relation.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order(mut self, field: impl Into<String>, direction: SortOrder) -> Self {
        self.order.push((field.into(), direction));
        self
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push("limit", self.limit).push("page", self.page);
        if !self.with.is_empty() {
            query.push("with", self.with.join(","));
        }
        query.extend(&self.filter.to_query());
        for (field, direction) in &self.order {
            query.push(format!("order[{field}]"), direction);
        }
        query
    }
}

/// `with=<a,b,...>` for endpoints that take nothing else, or an empty query.
pub(crate) fn with_query<S: AsRef<str>>(relations: &[S]) -> Query {
    let mut query = Query::new();
    if !relations.is_empty() {
        let joined = relations.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        query.push("with", joined);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_250() {
        assert_eq!(ListParams::new().to_query().encode(), "limit=250&page=1");
    }

    #[test]
    fn with_relations_are_comma_joined() {
        let query = ListParams::new()
            .limit(2)
            .with("contacts")
            .with("loss_reason")
            .to_query();
        assert_eq!(query.encode(), "limit=2&page=1&with=contacts%2Closs_reason");
    }

    #[test]
    fn range_suffixes_expand_to_nested_keys() {
        let filter = Filter::new()
            .eq("updated_at__from", 1_700_000_000)
            .eq("closed_at__to", 1_700_086_400)
            .eq("responsible_user_id", 42);
        let pairs = filter.to_query();
        let keys: Vec<_> = pairs.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "filter[updated_at][from]",
                "filter[closed_at][to]",
                "filter[responsible_user_id]",
            ]
        );
        assert_eq!(pairs.pairs()[1].1, "1700086400");
    }

    #[test]
    fn brackets_are_percent_encoded() {
        let query = Filter::new().from("created_at", 10).to_query();
        assert_eq!(query.encode(), "filter%5Bcreated_at%5D%5Bfrom%5D=10");
    }

    #[test]
    fn any_repeats_the_array_key() {
        let query = Filter::new().any("entity", ["lead", "contact"]).to_query();
        assert_eq!(
            query.pairs(),
            &[
                ("filter[entity][]".to_string(), "lead".to_string()),
                ("filter[entity][]".to_string(), "contact".to_string()),
            ]
        );
    }

    #[test]
    fn order_follows_filters() {
        let query = ListParams::new()
            .filter(Filter::new().eq("id", 5))
            .order("created_at", SortOrder::Desc)
            .to_query();
        let last = query.pairs().last().unwrap();
        assert_eq!(last, &("order[created_at]".to_string(), "desc".to_string()));
    }

    #[test]
    fn append_to_skips_empty_queries() {
        assert_eq!(Query::new().append_to("/api/v4/account"), "/api/v4/account");
        assert_eq!(
            with_query(&["amojo_id", "version"]).append_to("/api/v4/account"),
            "/api/v4/account?with=amojo_id%2Cversion"
        );
    }

    #[test]
    fn values_with_spaces_are_encoded() {
        let mut query = Query::new();
        query.push("query", "Иван Петров");
        assert!(query.encode().starts_with("query=%D0%98"));
        assert!(query.encode().contains("%20"));
    }
}
