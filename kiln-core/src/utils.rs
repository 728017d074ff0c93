//! Shared utility functions for code generation.

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ' ' | '.')
}

/// Convert a string to PascalCase (e.g., "get_city" -> "GetCity").
///
/// Already-PascalCase and camelCase inputs only get their first letter
/// upper-cased, so shape names like `GetObjectACL` survive unchanged.
pub fn to_pascal_case(s: &str) -> String {
    s.split(is_separator)
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to snake_case (e.g., "GetObjectACL" -> "get_object_acl").
///
/// A word boundary is placed before an upper-case letter that follows a
/// lower-case letter or a digit, and before the last capital of an acronym
/// that is followed by a lower-case letter (`HTTPServer` -> `http_server`).
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        }

        result.extend(c.to_lowercase());
    }

    while result.ends_with('_') {
        result.pop();
    }
    result
}
