//! Free-text employee search: query normalisation, `LIKE` pattern building and
//! the ranking rules shared by the PostgreSQL and in-memory repositories.
//!
//! A candidate matches when its name, phone or city contains the query,
//! ignoring case. Matches are grouped into [`SearchTier`]s (name prefix, then
//! phone prefix, then city prefix, then any other substring match) and ordered
//! by name inside each tier. Names compare bytewise, which the SQL side
//! matches with `COLLATE "C"`. At most [`SEARCH_RESULT_LIMIT`] rows come
//! back; there is no cursor, so callers that need more must narrow the query.

use core_types::Employee;

/// Hard cap on the number of rows a single search returns.
pub const SEARCH_RESULT_LIMIT: usize = 100;

/// How specifically an employee matched. Lower ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchTier {
    NamePrefix = 1,
    PhonePrefix = 2,
    CityPrefix = 3,
    Contains = 4,
}

/// Trims the raw query. `None` means there is nothing to search for.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Escapes `LIKE` metacharacters so the query is always matched literally.
///
/// The escape character is a backslash, matching `ESCAPE '\'` in the SQL.
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `%query%`: matches the query anywhere in a column.
pub fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like(query))
}

/// `query%`: matches columns that start with the query.
pub fn prefix_pattern(query: &str) -> String {
    format!("{}%", escape_like(query))
}

/// Decides whether `employee` matches and in which tier.
///
/// `needle` must already be lowercased.
pub fn classify(employee: &Employee, needle: &str) -> Option<SearchTier> {
    let name = employee.name.to_lowercase();
    let phone = employee.phone.to_lowercase();
    let city = employee.city.to_lowercase();

    if name.starts_with(needle) {
        Some(SearchTier::NamePrefix)
    } else if phone.starts_with(needle) {
        Some(SearchTier::PhonePrefix)
    } else if city.starts_with(needle) {
        Some(SearchTier::CityPrefix)
    } else if name.contains(needle) || phone.contains(needle) || city.contains(needle) {
        Some(SearchTier::Contains)
    } else {
        None
    }
}

/// Filters and orders `candidates` for an already-normalised query.
///
/// Ties inside a tier are broken by name, then id, so the order is total.
pub fn rank<I>(candidates: I, query: &str) -> Vec<Employee>
where
    I: IntoIterator<Item = Employee>,
{
    let needle = query.to_lowercase();
    let mut matches: Vec<(SearchTier, Employee)> = candidates
        .into_iter()
        .filter_map(|employee| classify(&employee, &needle).map(|tier| (tier, employee)))
        .collect();

    matches.sort_by(|(tier_a, a), (tier_b, b)| {
        tier_a
            .cmp(tier_b)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    matches
        .into_iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(|(_, employee)| employee)
        .collect()
}
