//! Rust naming conventions.

use kiln_codegen::language::NamingConvention;
use kiln_core::{to_pascal_case, to_snake_case};

/// Keywords that cannot be raw identifiers and get a trailing underscore.
const NOT_RAW: [&str; 4] = ["self", "Self", "super", "crate"];

fn escape_field(name: &str) -> String {
    if NOT_RAW.contains(&name) {
        format!("{}_", name)
    } else {
        format!("r#{}", name)
    }
}

fn escape_type(name: &str) -> String {
    format!("{}Value", name)
}

/// Rust naming conventions.
pub const RUST_NAMING: NamingConvention = NamingConvention {
    shape_to_type: to_pascal_case,
    member_to_field: to_snake_case,
    reserved_words: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
        "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
        "gen",
    ],
    reserved_types: &["Self", "Option", "Result", "Box", "Vec", "String", "Send", "Sync"],
    escape_field,
    escape_type,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(RUST_NAMING.type_name("getCity"), "GetCity");
        assert_eq!(RUST_NAMING.type_name("Self"), "SelfValue");
        assert_eq!(RUST_NAMING.type_name("Result"), "ResultValue");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(RUST_NAMING.field_name("cityId"), "city_id");
        assert_eq!(RUST_NAMING.field_name("type"), "r#type");
        assert_eq!(RUST_NAMING.field_name("Match"), "r#match");
    }

    #[test]
    fn test_non_raw_keywords_get_suffix() {
        assert_eq!(RUST_NAMING.field_name("self"), "self_");
        assert_eq!(RUST_NAMING.field_name("crate"), "crate_");
    }
}
