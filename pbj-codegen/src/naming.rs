//! Case conversion and Rust-identifier escaping: reserved words are
//! escaped with the `r#` raw-identifier prefix rather than a trailing
//! underscore or suffix, matching raw-identifier style for field
//! accessors.

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Escapes a field/variant name that collides with a Rust keyword by
/// prefixing it as a raw identifier (`r#type`), the idiomatic
/// equivalent of the `{name}_pb` suffixing applied to module paths.
pub fn escape_rust_ident(name: &str) -> String {
    if is_rust_keyword(name) {
        format!("r#{}", name)
    } else {
        name.to_owned()
    }
}

/// Converts a `snake_case`, `kebab-case`, or already-mixed proto field
/// name into idiomatic `snake_case`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in name.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_ascii_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_ascii_alphanumeric();
        }
    }
    out
}

/// Converts a proto type/message/enum name (already `PascalCase` by
/// convention, but not guaranteed) into `PascalCase`.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = true;
    for c in name.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Converts a dotted fully-qualified proto name (e.g. `.example.Account`)
/// into a dotted Rust module+type path (e.g. `example::Account`),
/// mirroring `proto_path_to_rust_mod`'s per-segment identifier
/// sanitization.
pub fn fqn_to_rust_path(fqn: &str) -> String {
    fqn.trim_start_matches('.')
        .split('.')
        .enumerate()
        .map(|(i, seg)| if i == 0 { to_snake_case(seg) } else { seg.to_owned() })
        .collect::<Vec<_>>()
        .join("::")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn snake_case_from_mixed_input() {
        assert_eq!(to_snake_case("accountId"), "account_id");
        assert_eq!(to_snake_case("account_id"), "account_id");
        assert_eq!(to_snake_case("AccountID"), "account_id");
    }

    #[test]
    fn pascal_case_from_snake_input() {
        assert_eq!(to_pascal_case("account_id"), "AccountId");
        assert_eq!(to_pascal_case("Account"), "Account");
    }

    #[test]
    fn escapes_keyword_field_names() {
        assert_eq!(escape_rust_ident("type"), "r#type");
        assert_eq!(escape_rust_ident("balance"), "balance");
    }

    #[test]
    fn fqn_converts_first_segment_to_snake_case_module_path() {
        assert_eq!(fqn_to_rust_path(".example.Account"), "example::Account");
    }
}
