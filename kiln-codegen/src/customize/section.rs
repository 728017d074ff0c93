//! Named extension points in generated code.
//!
//! A [`Section`] is a location a generator renders at, carrying the context
//! a contribution needs (variable names, the operation being generated).
//! [`SectionName`] is the payload-free key sections are registered under.

use std::fmt;

use kiln_model::ShapeId;

/// An extension point together with its render-time context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    Config(ConfigSection),
    SdkConfig(SdkConfigSection<'a>),
    LibRs(LibRsSection),
    Operation(OperationSection<'a>),
    Service(ServiceSection<'a>),
}

/// Locations inside the generated `config.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    /// Fields of `Config`.
    ConfigStruct,
    /// Items of `impl Config`.
    ConfigImpl,
    /// Fields of `Builder`.
    BuilderStruct,
    /// Items of `impl Builder`.
    BuilderImpl,
    /// Field initializers inside `Builder::build`.
    BuilderBuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkConfigSection<'a> {
    /// Statements copying one shared setting from the variable named
    /// `sdk_config` into the builder named `service_config_builder`.
    CopySdkConfigToClientConfig {
        sdk_config: &'a str,
        service_config_builder: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibRsSection {
    /// Crate-level attributes at the top of `lib.rs`.
    Attributes,
    /// Items appended to `lib.rs`.
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationSection<'a> {
    /// Statements run on the error builder named `builder_name` after the
    /// generic error fields were parsed from `response_name`.
    PopulateGenericErrorExtras {
        operation: &'a ShapeId,
        builder_name: &'a str,
        response_name: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSection<'a> {
    /// Items of `impl <Service>Builder`.
    BuilderImpl { service_name: &'a str },
    /// Statements at the start of `<Service>Builder::build`.
    BuildPrologue { service_name: &'a str },
}

impl Section<'_> {
    pub fn name(&self) -> SectionName {
        match self {
            Section::Config(ConfigSection::ConfigStruct) => SectionName::ConfigStruct,
            Section::Config(ConfigSection::ConfigImpl) => SectionName::ConfigImpl,
            Section::Config(ConfigSection::BuilderStruct) => SectionName::ConfigBuilderStruct,
            Section::Config(ConfigSection::BuilderImpl) => SectionName::ConfigBuilderImpl,
            Section::Config(ConfigSection::BuilderBuild) => SectionName::ConfigBuilderBuild,
            Section::SdkConfig(SdkConfigSection::CopySdkConfigToClientConfig { .. }) => {
                SectionName::CopySdkConfigToClientConfig
            }
            Section::LibRs(LibRsSection::Attributes) => SectionName::LibRsAttributes,
            Section::LibRs(LibRsSection::Body) => SectionName::LibRsBody,
            Section::Operation(OperationSection::PopulateGenericErrorExtras { .. }) => {
                SectionName::PopulateGenericErrorExtras
            }
            Section::Service(ServiceSection::BuilderImpl { .. }) => {
                SectionName::ServiceBuilderImpl
            }
            Section::Service(ServiceSection::BuildPrologue { .. }) => {
                SectionName::ServiceBuildPrologue
            }
        }
    }
}

/// Registration key of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionName {
    ConfigStruct,
    ConfigImpl,
    ConfigBuilderStruct,
    ConfigBuilderImpl,
    ConfigBuilderBuild,
    CopySdkConfigToClientConfig,
    LibRsAttributes,
    LibRsBody,
    PopulateGenericErrorExtras,
    ServiceBuilderImpl,
    ServiceBuildPrologue,
}

impl SectionName {
    /// The built-in section catalog.
    pub const ALL: [SectionName; 11] = [
        SectionName::ConfigStruct,
        SectionName::ConfigImpl,
        SectionName::ConfigBuilderStruct,
        SectionName::ConfigBuilderImpl,
        SectionName::ConfigBuilderBuild,
        SectionName::CopySdkConfigToClientConfig,
        SectionName::LibRsAttributes,
        SectionName::LibRsBody,
        SectionName::PopulateGenericErrorExtras,
        SectionName::ServiceBuilderImpl,
        SectionName::ServiceBuildPrologue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::ConfigStruct => "config.struct",
            SectionName::ConfigImpl => "config.impl",
            SectionName::ConfigBuilderStruct => "config.builder-struct",
            SectionName::ConfigBuilderImpl => "config.builder-impl",
            SectionName::ConfigBuilderBuild => "config.builder-build",
            SectionName::CopySdkConfigToClientConfig => "sdk-config.copy-to-client-config",
            SectionName::LibRsAttributes => "lib-rs.attributes",
            SectionName::LibRsBody => "lib-rs.body",
            SectionName::PopulateGenericErrorExtras => "operation.populate-generic-error-extras",
            SectionName::ServiceBuilderImpl => "service.builder-impl",
            SectionName::ServiceBuildPrologue => "service.build-prologue",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SectionName::ConfigStruct => "fields of the client Config",
            SectionName::ConfigImpl => "items of impl Config",
            SectionName::ConfigBuilderStruct => "fields of the config Builder",
            SectionName::ConfigBuilderImpl => "items of impl Builder",
            SectionName::ConfigBuilderBuild => "field initializers in Builder::build",
            SectionName::CopySdkConfigToClientConfig => {
                "statements copying shared SdkConfig settings into the Builder"
            }
            SectionName::LibRsAttributes => "crate attributes at the top of lib.rs",
            SectionName::LibRsBody => "items appended to lib.rs",
            SectionName::PopulateGenericErrorExtras => {
                "statements run on the generic error builder"
            }
            SectionName::ServiceBuilderImpl => "items of impl <Service>Builder",
            SectionName::ServiceBuildPrologue => "statements at the start of <Service>Builder::build",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = SectionName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(names.len(), SectionName::ALL.len());
    }

    #[test]
    fn test_section_name_ignores_payload() {
        let op: ShapeId = "example.weather#GetCity".parse().unwrap();
        let a = Section::Operation(OperationSection::PopulateGenericErrorExtras {
            operation: &op,
            builder_name: "builder",
            response_name: "response",
        });
        let b = Section::Operation(OperationSection::PopulateGenericErrorExtras {
            operation: &op,
            builder_name: "err",
            response_name: "resp",
        });
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
        assert_eq!(a.name().to_string(), "operation.populate-generic-error-extras");
    }

    #[test]
    fn test_every_section_maps_into_catalog() {
        let sections = [
            Section::Config(ConfigSection::BuilderBuild),
            Section::SdkConfig(SdkConfigSection::CopySdkConfigToClientConfig {
                sdk_config: "input",
                service_config_builder: "builder",
            }),
            Section::LibRs(LibRsSection::Attributes),
            Section::Service(ServiceSection::BuildPrologue {
                service_name: "Weather",
            }),
        ];
        for section in sections {
            assert!(SectionName::ALL.contains(&section.name()));
        }
    }
}
