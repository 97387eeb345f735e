//! Parameter name normalization.
//!
//! Incoming parameter keys arrive in whatever convention the client uses
//! (`per_page`, `sort-by`, …) and are normalized to the camel identifiers
//! handler tables are keyed by (`perPage`, `sortBy`). Normalization is pure
//! and total: characters outside the `_`/`-` delimiter set pass through
//! unchanged, so a key that is already camel-cased is its own normal form.

/// Normalize a raw parameter key into its canonical handler name.
///
/// Interior `_` and `-` delimiters are removed and the character following
/// each one is upper-cased. A leading delimiter run is kept verbatim so that
/// names like `__meta` stay recognizable to the reserved-prefix rule instead
/// of collapsing into an ordinary identifier.
///
/// ```
/// use filtercrate::normalize;
///
/// assert_eq!(normalize("search_by"), "searchBy");
/// assert_eq!(normalize("sort-by"), "sortBy");
/// assert_eq!(normalize("perPage"), "perPage");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    // Leading delimiters pass through untouched.
    while let Some(&c) = chars.peek() {
        if c == '_' || c == '-' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut upper_next = false;
    for c in chars {
        if c == '_' || c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
