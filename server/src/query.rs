use serde::Deserialize;
use thiserror::Error;
use utoipa::IntoParams;

pub const DEFAULT_LIMIT: i64 = 15;
pub const MAX_LIMIT: i64 = 1000;

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Page number, 1-based (default: 1, non-numeric treated as 1)
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    /// Page size (default: 15, max: 1000)
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    /// Case-insensitive substring match on the title
    pub title: Option<String>,
    /// Case-insensitive substring match on the cuisine
    pub cuisine: Option<String>,
    /// Prefix match on the serves text, e.g. "4" matches "4 servings"
    pub serves: Option<String>,
    /// Numeric filter, optionally operator-prefixed: "4", ">=3.5", "<=4"
    pub rating: Option<String>,
    /// Numeric filter on total time in minutes, same syntax as rating
    pub total_time: Option<String>,
}

/// Query parameters accepted by the plain listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Page number, 1-based (default: 1, non-numeric treated as 1)
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    /// Page size (default: 15, max: 1000)
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
}

/// Pagination parameters arrive as strings; anything that does not parse as
/// an integer falls back to the default instead of failing the request, so
/// `page=abc` is served as page 1 rather than a deserialization error.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<i64>().ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Cuisine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Rating,
    TotalTime,
}

impl NumericField {
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Rating => "rating",
            NumericField::TotalTime => "total_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

/// A single field constraint. All predicates on a query are conjunctive.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match anywhere in the field.
    Contains(TextField, String),
    /// Case-insensitive prefix match against the serves display text. The
    /// stored value is "N servings", so "4" matches "4 servings" but not
    /// "14 servings".
    ServesPrefix(String),
    /// Comparison against a nullable numeric column. SQL semantics: NULL
    /// never matches.
    Compare(NumericField, CmpOp, f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid numeric value for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A validated, fully-resolved query: typed predicates plus a page window.
/// Built once from request parameters, then handed to the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub predicates: Vec<Predicate>,
    pub page: i64,
    pub limit: i64,
}

impl RecipeQuery {
    /// An unfiltered listing query; the degenerate case the plain listing
    /// endpoint shares with search, so the pagination math lives in one place.
    pub fn unfiltered(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            predicates: Vec::new(),
            page: normalize_page(page),
            limit: normalize_limit(limit),
        }
    }

    pub fn from_params(params: &SearchParams) -> Result<Self, ValidationError> {
        let mut predicates = Vec::new();

        // Empty string means "no constraint", not "match empty string".
        if let Some(title) = non_empty(params.title.as_deref()) {
            predicates.push(Predicate::Contains(TextField::Title, title.to_string()));
        }
        if let Some(cuisine) = non_empty(params.cuisine.as_deref()) {
            predicates.push(Predicate::Contains(TextField::Cuisine, cuisine.to_string()));
        }
        if let Some(serves) = non_empty(params.serves.as_deref()) {
            predicates.push(Predicate::ServesPrefix(serves.to_string()));
        }
        if let Some(rating) = non_empty(params.rating.as_deref()) {
            let (op, value) = parse_comparison(NumericField::Rating, rating)?;
            predicates.push(Predicate::Compare(NumericField::Rating, op, value));
        }
        if let Some(total_time) = non_empty(params.total_time.as_deref()) {
            let (op, value) = parse_comparison(NumericField::TotalTime, total_time)?;
            predicates.push(Predicate::Compare(NumericField::TotalTime, op, value));
        }

        Ok(Self {
            predicates,
            page: normalize_page(params.page),
            limit: normalize_limit(params.limit),
        })
    }

    /// Zero-based row offset of the page window, applied after filtering and
    /// ordering.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Parse an optionally operator-prefixed numeric filter value. No prefix
/// means exact equality. The two-character operators must be tried before
/// their one-character prefixes.
fn parse_comparison(field: NumericField, raw: &str) -> Result<(CmpOp, f64), ValidationError> {
    let (op, rest) = if let Some(rest) = raw.strip_prefix(">=") {
        (CmpOp::Ge, rest)
    } else if let Some(rest) = raw.strip_prefix("<=") {
        (CmpOp::Le, rest)
    } else if let Some(rest) = raw.strip_prefix('>') {
        (CmpOp::Gt, rest)
    } else if let Some(rest) = raw.strip_prefix('<') {
        (CmpOp::Lt, rest)
    } else {
        (CmpOp::Eq, raw)
    };

    // Reject rather than query: a comparison against NaN matches nothing and
    // would hide the client's mistake. `f64::parse` accepts "NaN" and "inf",
    // so the finite check is load-bearing.
    let value = rest
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field: field.name(),
            value: raw.to_string(),
        })?;

    Ok((op, value))
}
