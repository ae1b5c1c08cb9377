use crate::error::ValidationError;
use core_types::{Field, NewEmployee};

/// Shortest accepted search query, in characters, after trimming.
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;
/// Longest accepted search query, in characters, after trimming.
pub const MAX_SEARCH_QUERY_CHARS: usize = 100;

/// Checks name, phone and city in that order and stops at the first empty one.
///
/// Only the empty string counts as missing; values are otherwise stored as sent.
pub fn validate_employee(employee: &NewEmployee) -> Result<(), ValidationError> {
    if employee.name.is_empty() {
        return Err(ValidationError::new(Field::Name, "name is required"));
    }
    if employee.phone.is_empty() {
        return Err(ValidationError::new(Field::Phone, "phone is required"));
    }
    if employee.city.is_empty() {
        return Err(ValidationError::new(Field::City, "city is required"));
    }
    Ok(())
}

/// Rejects an empty lookup key such as a city or phone path segment.
pub fn require(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, format!("{field} is required")));
    }
    Ok(())
}

/// Trims the query and enforces its length bounds. Returns the trimmed query.
pub fn validate_search_query(raw: &str) -> Result<&str, ValidationError> {
    let query = raw.trim();
    let chars = query.chars().count();

    if chars == 0 {
        return Err(ValidationError::new(
            Field::Query,
            "search query must not be empty",
        ));
    }
    if chars < MIN_SEARCH_QUERY_CHARS {
        return Err(ValidationError::new(
            Field::Query,
            format!("search query must be at least {MIN_SEARCH_QUERY_CHARS} characters"),
        ));
    }
    if chars > MAX_SEARCH_QUERY_CHARS {
        return Err(ValidationError::new(
            Field::Query,
            format!("search query must be at most {MAX_SEARCH_QUERY_CHARS} characters"),
        ));
    }
    Ok(query)
}
