//! Error returned when a service is built with unset operations.

use std::fmt;

/// Returned by `build()` when one or more operations have no handler.
///
/// Entries are kept in the order the builder checked them, which is
/// operation-id order for generated builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingOperationsError {
    service_name: String,
    entries: Vec<(String, String)>,
}

impl MissingOperationsError {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            entries: Vec::new(),
        }
    }

    /// Record a missing operation and the builder method that sets it.
    pub fn push(&mut self, operation: impl Into<String>, setter: impl Into<String>) {
        self.entries.push((operation.into(), setter.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// `(operation, setter)` pairs.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(operation, _)| operation.as_str())
    }

    pub fn setter_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, setter)| setter.as_str())
    }
}

impl fmt::Display for MissingOperationsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "You must specify a handler for all operations attached to `{}`.",
            self.service_name
        )?;
        writeln!(f, "We are missing handlers for the following operations:")?;
        for operation in self.operation_names() {
            writeln!(f, "- {}", operation)?;
        }

        writeln!(
            f,
            "\nUse the dedicated methods on `{}Builder` to register the missing handlers:",
            self.service_name
        )?;
        for setter in self.setter_names() {
            writeln!(f, "- {}", setter)?;
        }
        Ok(())
    }
}

impl std::error::Error for MissingOperationsError {}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_display_lists_operations_and_setters() {
        let mut err = MissingOperationsError::new("Weather");
        err.push("example.weather#GetCity", ".get_city()");
        err.push("example.weather#ListCities", ".list_cities()");

        assert_snapshot!(err.to_string(), @r"
        You must specify a handler for all operations attached to `Weather`.
        We are missing handlers for the following operations:
        - example.weather#GetCity
        - example.weather#ListCities

        Use the dedicated methods on `WeatherBuilder` to register the missing handlers:
        - .get_city()
        - .list_cities()
        ");
    }

    #[test]
    fn test_accessors() {
        let mut err = MissingOperationsError::new("Weather");
        assert!(err.is_empty());
        err.push("example.weather#GetCity", ".get_city()");

        assert_eq!(err.operation_names().collect::<Vec<_>>(), ["example.weather#GetCity"]);
        assert_eq!(err.setter_names().collect::<Vec<_>>(), [".get_city()"]);
        assert_eq!(err.service_name(), "Weather");
    }
}
