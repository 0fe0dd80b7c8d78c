//! Select queries for the dashboard's read operations.
//!
//! Each read operation maps to one [`SelectQuery`]: an optional
//! `filterByFormula`, an optional single-field sort, an optional record cap
//! and an optional named view.

use crate::mapping::fields;

/// Record cap for list views.
pub const LIST_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub filter_by_formula: Option<String>,
    pub sort: Option<Sort>,
    pub max_records: Option<usize>,
    pub view: Option<String>,
}

impl SelectQuery {
    /// Query-string pairs in Airtable's `list records` encoding.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(max) = self.max_records {
            params.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(ref view) = self.view {
            params.push(("view".to_string(), view.clone()));
        }
        if let Some(ref formula) = self.filter_by_formula {
            params.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort[0][field]".to_string(), sort.field.clone()));
            params.push((
                "sort[0][direction]".to_string(),
                sort.direction.as_str().to_string(),
            ));
        }
        params
    }
}

/// Quote `value` as an Airtable formula string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `{Field} = "value"`
pub fn field_equals(field: &str, value: &str) -> String {
    format!("{{{}}} = {}", field, string_literal(value))
}

// ============================================================================
// Per-operation queries
// ============================================================================

pub fn list_leads(view: &str) -> SelectQuery {
    SelectQuery {
        max_records: Some(LIST_CAP),
        view: Some(view.to_string()),
        ..Default::default()
    }
}

pub fn lead_by_custom_id(custom_id: &str) -> SelectQuery {
    SelectQuery {
        filter_by_formula: Some(field_equals(fields::LEAD_CUSTOM_ID, custom_id)),
        max_records: Some(1),
        ..Default::default()
    }
}

/// Uncapped: every message for the recipient, newest first.
pub fn messages_for_recipient(recipient: &str) -> SelectQuery {
    SelectQuery {
        filter_by_formula: Some(field_equals(fields::MESSAGE_RECIPIENT, recipient)),
        sort: Some(Sort::desc(fields::MESSAGE_CREATED)),
        ..Default::default()
    }
}

pub fn list_posts(view: &str) -> SelectQuery {
    SelectQuery {
        sort: Some(Sort::desc(fields::POST_PUBLISHED_AT)),
        max_records: Some(LIST_CAP),
        view: Some(view.to_string()),
        ..Default::default()
    }
}

pub fn posts_for_lead(lead_id: &str, view: &str) -> SelectQuery {
    SelectQuery {
        filter_by_formula: Some(field_equals(fields::POST_AUTHOR, lead_id)),
        ..list_posts(view)
    }
}
