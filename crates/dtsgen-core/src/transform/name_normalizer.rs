use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToPascalCase};

/// Turn a schema key into a property name.
///
/// Whitespace runs become a single underscore. With `camel_case` the key is
/// lower-camel-cased; otherwise it is kept as written. Names that are not
/// valid bare identifiers are single-quoted.
pub fn to_identifier(raw: &str, camel_case: bool) -> String {
    let spaced = underscore_whitespace(raw);
    let name = if camel_case {
        let camel = spaced.to_lower_camel_case();
        if camel.is_empty() { spaced } else { camel }
    } else {
        spaced
    };

    if is_identifier(&name) {
        name
    } else {
        quote(&name)
    }
}

/// Turn a schema key into a type name. The result is always a valid identifier.
///
/// Whitespace runs become underscores. Other characters that cannot appear in
/// an identifier split the key, and each segment after the first is
/// capitalised. With `camel_case` the whole name is PascalCased.
pub fn to_type_name(raw: &str, camel_case: bool) -> String {
    let spaced = underscore_whitespace(raw);
    let name = if camel_case {
        spaced.to_pascal_case()
    } else {
        join_segments(&spaced)
    };

    if name.is_empty() {
        return "Unnamed".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    name
}

/// PascalCase form of a property key, used to extend a context name when
/// naming anonymous nested types.
pub fn to_pascal_segment(raw: &str) -> String {
    let pascal = underscore_whitespace(raw).to_pascal_case();
    if pascal.is_empty() {
        "Property".to_string()
    } else {
        pascal
    }
}

/// Whether `name` can be used as a bare TypeScript identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}

/// Claim `base` in `used`, appending `2`, `3`, … until the name is free.
pub fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut i = 2;
    loop {
        let candidate = format!("{base}{i}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn underscore_whitespace(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                result.push('_');
            }
            in_whitespace = true;
        } else {
            result.push(ch);
            in_whitespace = false;
        }
    }
    result
}

fn join_segments(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for (i, segment) in name
        .split(|c: char| !is_identifier_char(c))
        .filter(|s| !s.is_empty())
        .enumerate()
    {
        if i == 0 {
            result.push_str(segment);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
        }
    }
    result
}

fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('\'');
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
