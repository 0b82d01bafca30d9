use dtsgen_core::ir::{Literal, Primitive, TypeRef};

/// Map a `TypeRef` to its TypeScript type string representation.
pub fn type_ref_to_ts(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Primitive(p) => primitive_to_ts(*p).to_string(),
        TypeRef::Literal(literal) => literal_to_ts(literal),
        TypeRef::Named(name) => name.clone(),
        TypeRef::Array(inner) => {
            let inner_ts = type_ref_to_ts(inner);
            if matches!(inner.as_ref(), TypeRef::Union(members) if members.len() > 1) {
                format!("({inner_ts})[]")
            } else {
                format!("{inner_ts}[]")
            }
        }
        TypeRef::Union(members) => {
            if members.is_empty() {
                return "any".to_string();
            }
            let member_strs: Vec<String> = members.iter().map(type_ref_to_ts).collect();
            member_strs.join(" | ")
        }
        TypeRef::Map(values) => format!("{{ [key: string]: {} }}", type_ref_to_ts(values)),
        TypeRef::Any => "any".to_string(),
    }
}

fn primitive_to_ts(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "string",
        Primitive::Number => "number",
        Primitive::Boolean => "boolean",
        Primitive::Null => "null",
    }
}

fn literal_to_ts(literal: &Literal) -> String {
    match literal {
        Literal::String(s) => quote_string(s),
        Literal::Number(n) => n.to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Null => "null".to_string(),
    }
}

/// Single-quoted TypeScript string literal. Line terminators and other
/// control characters are escaped so the literal stays on one line.
fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
