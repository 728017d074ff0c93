//! Naming conventions for target languages.

/// Language-specific naming conventions.
///
/// Defines how shape names become type, module and field names, and how
/// reserved words are escaped.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Shape name to type name (e.g., "get_city" -> "GetCity")
    pub shape_to_type: fn(&str) -> String,
    /// Shape or member name to field/function name (e.g., "cityId" -> "city_id")
    pub member_to_field: fn(&str) -> String,
    /// Reserved words that cannot be used as field names
    pub reserved_words: &'static [&'static str],
    /// Reserved type names (e.g., "Self" in Rust)
    pub reserved_types: &'static [&'static str],
    /// Escape a reserved field name (e.g., "type" -> "r#type" in Rust)
    pub escape_field: fn(&str) -> String,
    /// Escape a reserved type name (e.g., "Self" -> "SelfValue" in Rust)
    pub escape_type: fn(&str) -> String,
}

impl NamingConvention {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    pub fn is_reserved_type(&self, name: &str) -> bool {
        self.reserved_types.contains(&name)
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.shape_to_type)(name);
        if self.is_reserved_type(&transformed) {
            (self.escape_type)(&transformed)
        } else {
            transformed
        }
    }

    /// Transform and make safe for use as a field or function name.
    pub fn field_name(&self, name: &str) -> String {
        let transformed = (self.member_to_field)(name);
        if self.is_reserved(&transformed) {
            (self.escape_field)(&transformed)
        } else {
            transformed
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::{to_pascal_case, to_snake_case};

    use super::*;

    fn raw(name: &str) -> String {
        format!("r#{}", name)
    }

    fn suffixed(name: &str) -> String {
        format!("{}Value", name)
    }

    const TEST: NamingConvention = NamingConvention {
        shape_to_type: to_pascal_case,
        member_to_field: to_snake_case,
        reserved_words: &["type", "match"],
        reserved_types: &["Self"],
        escape_field: raw,
        escape_type: suffixed,
    };

    #[test]
    fn test_field_names() {
        assert_eq!(TEST.field_name("cityId"), "city_id");
        assert_eq!(TEST.field_name("Type"), "r#type");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TEST.type_name("get_city"), "GetCity");
        assert_eq!(TEST.type_name("self"), "SelfValue");
    }
}
