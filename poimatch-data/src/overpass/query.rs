//! Overpass QL rendering for candidate lookups.

use std::fmt::Write as _;

use poimatch_core::QueryFilter;

/// Object types searched for every filter.
const ELEMENT_TYPES: [&str; 3] = ["node", "way", "relation"];

/// Escape `raw` for use inside a double-quoted Overpass string literal.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a radius query for elements matching any of `filters`.
///
/// Each filter expands to one `node`, `way` and `relation` clause, all
/// unioned together, so an element matching any filter is returned. The
/// query asks for JSON output with metadata.
///
/// # Examples
/// ```
/// use poimatch_core::QueryFilter;
/// use poimatch_data::overpass::build_query;
///
/// let query = build_query(&[QueryFilter::new("ref", "124-37")], 1000.0, -33.96, 18.4, 20);
/// assert!(query.starts_with("[out:json][timeout:20];"));
/// assert!(query.contains(r#"node["ref"="124-37"](around:1000,-33.96,18.4);"#));
/// assert!(query.ends_with("out meta;\n"));
/// ```
#[must_use]
pub fn build_query(
    filters: &[QueryFilter],
    radius: f64,
    latitude: f64,
    longitude: f64,
    timeout_secs: u64,
) -> String {
    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for filter in filters {
        let key = escape(&filter.key);
        let value = escape(&filter.value);
        for element in ELEMENT_TYPES {
            // Writing to a `String` cannot fail.
            let _ = writeln!(
                query,
                "  {element}[\"{key}\"=\"{value}\"](around:{radius},{latitude},{longitude});"
            );
        }
    }
    query.push_str(");\nout meta;\n");
    query
}
