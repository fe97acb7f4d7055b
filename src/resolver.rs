//! Record Resolver
//!
//! Partial-name matching shared by every store. A query matches a stored key
//! when the lower-cased, trimmed key contains the lower-cased, trimmed query.
//!
//! Ordering: stores keep their name keys in a `BTreeMap`, so candidates are
//! visited in ascending key order. A key equal to the query wins outright;
//! otherwise the first containing key wins. When several employees contain
//! the query, the alphabetically first one is returned and no further
//! disambiguation is attempted.

use std::collections::BTreeMap;
use tracing::debug;

/// Lower-case and trim a name or query
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Return the key equal to `query`, else the first key containing it in
/// iteration order. Empty or whitespace-only queries never match.
pub fn first_match<'a, I>(query: &str, keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = normalize(query);
    if needle.is_empty() {
        return None;
    }

    let mut found = None;
    for key in keys {
        let candidate = normalize(key);
        if candidate == needle {
            return Some(key);
        }
        if found.is_none() && candidate.contains(&needle) {
            found = Some(key);
        }
    }
    if found.is_none() {
        debug!("No record matches '{}'", needle);
    }
    found
}

/// Map flavour of [`first_match`]: returns the matching key and its value
pub fn first_match_entry<'a, V>(
    query: &str,
    map: &'a BTreeMap<String, V>,
) -> Option<(&'a str, &'a V)> {
    let key = first_match(query, map.keys().map(String::as_str))?;
    map.get_key_value(key).map(|(k, v)| (k.as_str(), v))
}

/// Upper-case the first letter of every word, lower-case the rest
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
