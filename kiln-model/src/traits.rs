//! Typed trait annotations attached to shapes.

use std::{collections::BTreeMap, fmt};

use crate::ShapeId;

/// Wire protocols a service may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolId {
    RestJson1,
    RestXml,
    AwsJson1_0,
    AwsJson1_1,
}

impl ProtocolId {
    pub const ALL: [ProtocolId; 4] = [
        ProtocolId::RestJson1,
        ProtocolId::RestXml,
        ProtocolId::AwsJson1_0,
        ProtocolId::AwsJson1_1,
    ];

    /// Absolute id of the trait that declares this protocol.
    pub fn trait_id(&self) -> &'static str {
        match self {
            ProtocolId::RestJson1 => "aws.protocols#restJson1",
            ProtocolId::RestXml => "aws.protocols#restXml",
            ProtocolId::AwsJson1_0 => "aws.protocols#awsJson1_0",
            ProtocolId::AwsJson1_1 => "aws.protocols#awsJson1_1",
        }
    }

    pub fn from_trait_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.trait_id() == id)
    }

    /// Short name used in generated identifiers and listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolId::RestJson1 => "restJson1",
            ProtocolId::RestXml => "restXml",
            ProtocolId::AwsJson1_0 => "awsJson1_0",
            ProtocolId::AwsJson1_1 => "awsJson1_1",
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the wire is at fault for an error structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFault {
    Client,
    Server,
}

/// One allowed value of an enum-constrained string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub value: String,
    pub name: Option<String>,
}

/// HTTP binding of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpTrait {
    pub method: String,
    pub uri: String,
    pub code: u16,
}

/// Discriminant of a [`Trait`], used as the key in [`Traits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraitKind {
    Documentation,
    Required,
    Streaming,
    Pattern,
    Enum,
    Http,
    Error,
    Protocol(ProtocolId),
    SyntheticInput,
    SyntheticOutput,
    RefactoredMember,
    AllowInvalidXmlRoot,
}

impl TraitKind {
    /// Absolute trait id as it appears in the JSON model.
    pub fn id(&self) -> &'static str {
        match self {
            TraitKind::Documentation => "smithy.api#documentation",
            TraitKind::Required => "smithy.api#required",
            TraitKind::Streaming => "smithy.api#streaming",
            TraitKind::Pattern => "smithy.api#pattern",
            TraitKind::Enum => "smithy.api#enum",
            TraitKind::Http => "smithy.api#http",
            TraitKind::Error => "smithy.api#error",
            TraitKind::Protocol(protocol) => protocol.trait_id(),
            TraitKind::SyntheticInput => "kiln.synthetic#syntheticInput",
            TraitKind::SyntheticOutput => "kiln.synthetic#syntheticOutput",
            TraitKind::RefactoredMember => "smithy.api.internal#refactoredMember",
            TraitKind::AllowInvalidXmlRoot => "kiln.synthetic#allowInvalidXmlRoot",
        }
    }
}

/// A typed annotation on a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trait {
    Documentation(String),
    Required,
    Streaming,
    Pattern(String),
    Enum(Vec<EnumValue>),
    Http(HttpTrait),
    Error(ErrorFault),
    Protocol(ProtocolId),
    /// Marks a structure created as the input envelope of `operation`.
    SyntheticInput { operation: ShapeId },
    /// Marks a structure created as the output envelope of `operation`.
    SyntheticOutput { operation: ShapeId },
    /// Records the member a synthetic member was copied from.
    RefactoredMember { source: ShapeId },
    /// The XML root element of this structure may not match its name.
    AllowInvalidXmlRoot,
}

impl Trait {
    pub fn kind(&self) -> TraitKind {
        match self {
            Trait::Documentation(_) => TraitKind::Documentation,
            Trait::Required => TraitKind::Required,
            Trait::Streaming => TraitKind::Streaming,
            Trait::Pattern(_) => TraitKind::Pattern,
            Trait::Enum(_) => TraitKind::Enum,
            Trait::Http(_) => TraitKind::Http,
            Trait::Error(_) => TraitKind::Error,
            Trait::Protocol(protocol) => TraitKind::Protocol(*protocol),
            Trait::SyntheticInput { .. } => TraitKind::SyntheticInput,
            Trait::SyntheticOutput { .. } => TraitKind::SyntheticOutput,
            Trait::RefactoredMember { .. } => TraitKind::RefactoredMember,
            Trait::AllowInvalidXmlRoot => TraitKind::AllowInvalidXmlRoot,
        }
    }
}

/// The set of traits on a shape, at most one per [`TraitKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traits(BTreeMap<TraitKind, Trait>);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `t`, replacing any trait of the same kind.
    pub fn insert(&mut self, t: Trait) -> Option<Trait> {
        self.0.insert(t.kind(), t)
    }

    pub fn remove(&mut self, kind: TraitKind) -> Option<Trait> {
        self.0.remove(&kind)
    }

    pub fn has(&self, kind: TraitKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn get(&self, kind: TraitKind) -> Option<&Trait> {
        self.0.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn documentation(&self) -> Option<&str> {
        match self.get(TraitKind::Documentation) {
            Some(Trait::Documentation(doc)) => Some(doc),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.has(TraitKind::Required)
    }

    pub fn is_streaming(&self) -> bool {
        self.has(TraitKind::Streaming)
    }

    pub fn pattern(&self) -> Option<&str> {
        match self.get(TraitKind::Pattern) {
            Some(Trait::Pattern(pattern)) => Some(pattern),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> Option<&[EnumValue]> {
        match self.get(TraitKind::Enum) {
            Some(Trait::Enum(values)) => Some(values),
            _ => None,
        }
    }

    pub fn http(&self) -> Option<&HttpTrait> {
        match self.get(TraitKind::Http) {
            Some(Trait::Http(http)) => Some(http),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ErrorFault> {
        match self.get(TraitKind::Error) {
            Some(Trait::Error(fault)) => Some(*fault),
            _ => None,
        }
    }

    /// Every protocol declared on the shape, in [`ProtocolId`] order.
    pub fn protocols(&self) -> Vec<ProtocolId> {
        self.0
            .keys()
            .filter_map(|kind| match kind {
                TraitKind::Protocol(protocol) => Some(*protocol),
                _ => None,
            })
            .collect()
    }

    /// The operation this structure is the synthetic input of.
    pub fn synthetic_input(&self) -> Option<&ShapeId> {
        match self.get(TraitKind::SyntheticInput) {
            Some(Trait::SyntheticInput { operation }) => Some(operation),
            _ => None,
        }
    }

    /// The operation this structure is the synthetic output of.
    pub fn synthetic_output(&self) -> Option<&ShapeId> {
        match self.get(TraitKind::SyntheticOutput) {
            Some(Trait::SyntheticOutput { operation }) => Some(operation),
            _ => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.has(TraitKind::SyntheticInput) || self.has(TraitKind::SyntheticOutput)
    }

    pub fn refactored_from(&self) -> Option<&ShapeId> {
        match self.get(TraitKind::RefactoredMember) {
            Some(Trait::RefactoredMember { source }) => Some(source),
            _ => None,
        }
    }
}

impl FromIterator<Trait> for Traits {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        let mut traits = Traits::new();
        for t in iter {
            traits.insert(t);
        }
        traits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut traits = Traits::new();
        traits.insert(Trait::Pattern("^a$".into()));
        let previous = traits.insert(Trait::Pattern("^b$".into()));

        assert_eq!(previous, Some(Trait::Pattern("^a$".into())));
        assert_eq!(traits.pattern(), Some("^b$"));
    }

    #[test]
    fn test_multiple_protocols_are_kept_apart() {
        let traits: Traits = [
            Trait::Protocol(ProtocolId::RestXml),
            Trait::Protocol(ProtocolId::RestJson1),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            traits.protocols(),
            vec![ProtocolId::RestJson1, ProtocolId::RestXml]
        );
    }

    #[test]
    fn test_synthetic_markers() {
        let op = ShapeId::new("example", "GetCity");
        let traits: Traits = [Trait::SyntheticInput {
            operation: op.clone(),
        }]
        .into_iter()
        .collect();

        assert!(traits.is_synthetic());
        assert_eq!(traits.synthetic_input(), Some(&op));
        assert_eq!(traits.synthetic_output(), None);
    }

    #[test]
    fn test_protocol_trait_ids() {
        for protocol in ProtocolId::ALL {
            assert_eq!(ProtocolId::from_trait_id(protocol.trait_id()), Some(protocol));
        }
        assert_eq!(ProtocolId::from_trait_id("aws.protocols#ec2Query"), None);
    }
}
