//! Compendium Query Engine
//!
//! Evaluates search, field filters, and pagination against one system's
//! entry collections. Every call snapshots the system once via the
//! registry and never touches shared mutable state, so concurrent
//! queries interleave freely.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::registry::{CompendiumEntry, SystemRegistry};
use super::types::ContentType;

/// Page size used when the request does not specify one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Hard ceiling on page size. Larger requests are clamped, not rejected.
pub const MAX_LIMIT: u32 = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Compendium query errors. All variants are user input errors; a valid
/// request with no matching data is an empty result, never an error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid content type '{requested}'. Valid types: {valid}")]
    InvalidType { requested: String, valid: String },

    #[error("Game system not found: {0}")]
    SystemNotFound(String),

    #[error("Invalid page parameter '{0}': expected a positive integer")]
    InvalidPagination(String),

    #[error("Invalid limit parameter '{0}': expected a positive integer")]
    InvalidLimit(String),
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Parsed query parameters for a compendium search.
///
/// `filters` is already structured by the transport layer (which owns
/// the `filter[field]=value` bracket syntax). `page` and `limit` stay
/// raw here and are validated before any data access, so a malformed
/// number is reported as such rather than as an empty result.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Free-text search. Empty or whitespace-only is the same as none.
    pub search: Option<String>,
    /// Field filters. Every listed field must match (conjunction); a
    /// field with several values matches if the entry's value is any of
    /// them. An empty value set matches nothing.
    pub filters: IndexMap<String, Vec<String>>,
    /// Raw page parameter as received. `None` defaults to 1.
    pub page: Option<String>,
    /// Raw limit parameter as received. `None` defaults to 20.
    pub limit: Option<String>,
}

impl QueryParams {
    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, values: &[&str]) -> Self {
        self.filters
            .insert(field.into(), values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// One page of filtered, ordered results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub entries: Vec<CompendiumEntry>,
    pub total: usize,
    pub page: u64,
    pub limit: u32,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

// ============================================================================
// Operations
// ============================================================================

/// List the content types a system actually has entries for, in catalog
/// order. A type with an absent or empty collection is omitted.
pub fn list_types(
    registry: &SystemRegistry,
    system_id: &str,
) -> Result<Vec<ContentType>, QueryError> {
    let system = registry
        .get_system(system_id)
        .ok_or_else(|| QueryError::SystemNotFound(system_id.to_string()))?;

    Ok(ContentType::ALL
        .iter()
        .copied()
        .filter(|t| system.collection(*t).is_some_and(|c| !c.is_empty()))
        .collect())
}

/// Run a filtered, searched, paginated query over one entry collection.
///
/// Validation happens before any data access: content type, then system
/// id, then page, then limit. Surviving entries are ordered by entry id
/// ascending so pagination is stable across repeated calls.
pub fn search(
    registry: &SystemRegistry,
    system_id: &str,
    type_name: &str,
    params: &QueryParams,
) -> Result<SearchResult, QueryError> {
    let content_type = parse_type(type_name)?;
    let system = registry
        .get_system(system_id)
        .ok_or_else(|| QueryError::SystemNotFound(system_id.to_string()))?;
    let page = parse_page(params.page.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    let needle = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    // An absent collection is an empty one: zero matches, not an error.
    let mut matched: Vec<(&String, &CompendiumEntry)> = system
        .collection(content_type)
        .map(|collection| {
            collection
                .iter()
                .filter(|(_, entry)| matches_filters(entry, &params.filters))
                .filter(|(_, entry)| {
                    needle
                        .as_deref()
                        .map_or(true, |needle| matches_search(entry, needle))
                })
                .collect()
        })
        .unwrap_or_default();

    matched.sort_by(|a, b| a.0.cmp(b.0));

    let total = matched.len();
    let start = page
        .saturating_sub(1)
        .saturating_mul(u64::from(limit))
        .min(total as u64) as usize;
    let entries: Vec<CompendiumEntry> = matched
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .map(|(_, entry)| entry.clone())
        .collect();

    Ok(SearchResult {
        entries,
        total,
        page,
        limit,
        has_more: page.saturating_mul(u64::from(limit)) < total as u64,
    })
}

/// Look up a single entry. Unknown entry id is `Ok(None)`; only a bad
/// content type or system id is an error.
pub fn get_entry(
    registry: &SystemRegistry,
    system_id: &str,
    type_name: &str,
    entry_id: &str,
) -> Result<Option<CompendiumEntry>, QueryError> {
    let content_type = parse_type(type_name)?;
    let system = registry
        .get_system(system_id)
        .ok_or_else(|| QueryError::SystemNotFound(system_id.to_string()))?;

    Ok(system
        .collection(content_type)
        .and_then(|collection| collection.get(entry_id))
        .cloned())
}

// ============================================================================
// Evaluation Helpers
// ============================================================================

fn parse_type(type_name: &str) -> Result<ContentType, QueryError> {
    ContentType::parse(type_name).ok_or_else(|| QueryError::InvalidType {
        requested: type_name.to_string(),
        valid: ContentType::valid_list(),
    })
}

fn parse_page(raw: Option<&str>) -> Result<u64, QueryError> {
    match raw {
        None => Ok(1),
        Some(s) => match s.trim().parse::<u64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(QueryError::InvalidPagination(s.to_string())),
        },
    }
}

fn parse_limit(raw: Option<&str>) -> Result<u32, QueryError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(s) => match s.trim().parse::<u64>() {
            // Clamped on the high side only; zero and negatives are errors.
            Ok(n) if n >= 1 => Ok(n.min(u64::from(MAX_LIMIT)) as u32),
            _ => Err(QueryError::InvalidLimit(s.to_string())),
        },
    }
}

/// Conjunction across fields, disjunction within a field. A field the
/// entry lacks never matches, and an empty value set matches nothing.
fn matches_filters(entry: &Value, filters: &IndexMap<String, Vec<String>>) -> bool {
    filters.iter().all(|(field, values)| {
        entry
            .get(field)
            .map(|value| values.iter().any(|want| value_matches(value, want)))
            .unwrap_or(false)
    })
}

/// Compare one entry field against one filter value. Query parameters
/// arrive as text, so numbers and booleans match their canonical text
/// rendering; null, arrays, and objects never match.
fn value_matches(value: &Value, want: &str) -> bool {
    match value {
        Value::String(s) => s == want,
        Value::Number(n) => n.to_string() == want,
        Value::Bool(b) => b.to_string() == want,
        _ => false,
    }
}

/// Case-insensitive substring search over every string scalar in the
/// entry. `needle` must already be trimmed and lowercased.
fn matches_search(entry: &Value, needle: &str) -> bool {
    fn walk(value: &Value, needle: &str) -> bool {
        match value {
            Value::String(s) => s.to_lowercase().contains(needle),
            Value::Array(items) => items.iter().any(|v| walk(v, needle)),
            Value::Object(map) => map.values().any(|v| walk(v, needle)),
            _ => false,
        }
    }
    walk(entry, needle)
}
