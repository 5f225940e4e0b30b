//! Environment variable name derivation.
//!
//! A structural path maps onto one variable name: each segment becomes
//! upper snake-case, segments join with a double underscore, and the
//! caller's prefix lands in front verbatim.

/// Derive the variable name for a field path.
///
/// ```
/// use envlayer::derive_var_name;
///
/// let name = derive_var_name("CONFIG_OVERRIDE_", &["someLibrary", "deeper", "hostName"]);
/// assert_eq!(name, "CONFIG_OVERRIDE_SOME_LIBRARY__DEEPER__HOST_NAME");
/// ```
pub fn derive_var_name(prefix: &str, path: &[&str]) -> String {
    let mut name = String::from(prefix);
    for (index, segment) in path.iter().enumerate() {
        if index > 0 {
            name.push_str("__");
        }
        name.push_str(&upper_snake(segment));
    }
    name
}

/// Upper snake-case one identifier-like segment: `hostName` → `HOST_NAME`,
/// `HTTPServer` → `HTTP_SERVER`. Existing `-`, `_`, `.` and spaces act as
/// separators and collapse.
pub(crate) fn upper_snake(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);
    for (index, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '_' | ' ' | '.') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && !out.is_empty() && !out.ends_with('_') {
            let previous = chars[index - 1];
            let after_word = previous.is_ascii_lowercase() || previous.is_ascii_digit();
            let acronym_end = previous.is_ascii_uppercase()
                && chars.get(index + 1).is_some_and(|next| next.is_ascii_lowercase());
            if after_word || acronym_end {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
