//! Shared naming utilities for consistent case conversion across the codebase.
//!
//! Declaration names are PascalCase as delivered by the schema layer. Output
//! paths use kebab-case, and the filter pass needs to strip variant tokens
//! from names. Everything that turns a declaration name into something else
//! lives here so that paths and imports agree on spelling.

/// Convert a PascalCase or camelCase name to kebab-case
///
/// Acronyms stay together and a new word starts where an acronym meets a
/// capitalized word.
///
/// # Examples
/// ```
/// use typeforge_core::naming::to_kebab_case;
/// assert_eq!(to_kebab_case("User"), "user");
/// assert_eq!(to_kebab_case("UserWhereInput"), "user-where-input");
/// assert_eq!(to_kebab_case("DateTimeFilter"), "date-time-filter");
/// assert_eq!(to_kebab_case("JSONFilter"), "json-filter");
/// assert_eq!(to_kebab_case("user_profile"), "user-profile");
/// ```
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }

        out.extend(c.to_lowercase());
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Strip a trailing suffix when something remains in front of it
///
/// # Examples
/// ```
/// use typeforge_core::naming::strip_suffix_nonempty;
/// assert_eq!(strip_suffix_nonempty("UserWhereInput", "Input"), "UserWhere");
/// assert_eq!(strip_suffix_nonempty("Input", "Input"), "Input");
/// ```
pub fn strip_suffix_nonempty<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// Remove every occurrence of the given tokens from a name
///
/// Used to derive the base name of a filter variant.
///
/// # Examples
/// ```
/// use typeforge_core::naming::remove_tokens;
/// let tokens = ["Nullable", "Nested"];
/// assert_eq!(remove_tokens("NestedStringNullableFilter", &tokens), "StringFilter");
/// ```
pub fn remove_tokens(name: &str, tokens: &[&str]) -> String {
    tokens
        .iter()
        .fold(name.to_string(), |acc, token| acc.replace(token, ""))
}
