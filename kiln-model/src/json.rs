//! Loader for the JSON model AST (`{"smithy": "2.0", "shapes": {...}}`).
//!
//! Only the subset the generator consumes is understood. Resources, mixins
//! and other unrecognized shape properties are ignored; unknown traits are
//! dropped with a warning.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    EnumValue, ErrorFault, HttpTrait, Model, ModelError, NumberType, ProtocolId, Shape, ShapeBody,
    ShapeId, Trait, TraitKind, Traits,
};

const UNIT: &str = "smithy.api#Unit";
const ENUM_VALUE: &str = "smithy.api#enumValue";

#[derive(Debug, Deserialize)]
struct AstModel {
    #[serde(default)]
    shapes: IndexMap<String, AstShape>,
}

#[derive(Debug, Deserialize)]
struct AstShape {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    members: IndexMap<String, AstMember>,
    member: Option<AstMember>,
    key: Option<AstMember>,
    value: Option<AstMember>,
    input: Option<AstTarget>,
    output: Option<AstTarget>,
    #[serde(default)]
    errors: Vec<AstTarget>,
    #[serde(default)]
    version: String,
    #[serde(default)]
    operations: Vec<AstTarget>,
    #[serde(default)]
    traits: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AstMember {
    target: String,
    #[serde(default)]
    traits: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AstTarget {
    target: String,
}

impl Model {
    /// Parse a JSON model AST into a validated model.
    pub fn from_json_str(json: &str) -> Result<Model, ModelError> {
        let ast: AstModel = serde_json::from_str(json)?;
        let mut builder = Model::builder();

        for (raw_id, ast_shape) in ast.shapes {
            let id: ShapeId = raw_id.parse()?;
            for shape in lower_shape(id, ast_shape)? {
                builder.insert(shape);
            }
        }

        let model = builder.build()?;
        tracing::debug!(shapes = model.len(), "loaded model");
        Ok(model)
    }
}

/// Lower one AST shape into the shape plus any member shapes it declares.
fn lower_shape(id: ShapeId, ast: AstShape) -> Result<Vec<Shape>, ModelError> {
    // Enum shapes carry their values as members; fold them into the enum trait.
    let enum_values = (ast.kind == "enum").then(|| {
        ast.members
            .iter()
            .map(|(name, m)| EnumValue {
                value: m
                    .traits
                    .get(ENUM_VALUE)
                    .and_then(Value::as_str)
                    .unwrap_or(name)
                    .to_string(),
                name: Some(name.clone()),
            })
            .collect::<Vec<_>>()
    });

    let mut out = Vec::new();
    let mut member = |name: &str, ast_member: AstMember| -> Result<ShapeId, ModelError> {
        let member_id = id.with_member(name);
        let target: ShapeId = ast_member.target.parse()?;
        let mut shape = Shape::member(member_id.clone(), target);
        shape.traits = parse_traits(&member_id, &ast_member.traits)?;
        out.push(shape);
        Ok(member_id)
    };

    let body = match ast.kind.as_str() {
        "structure" | "union" => {
            let members = ast
                .members
                .into_iter()
                .map(|(name, m)| member(&name, m))
                .collect::<Result<Vec<_>, _>>()?;
            if ast.kind == "structure" {
                ShapeBody::Structure { members }
            } else {
                ShapeBody::Union { members }
            }
        }
        "list" | "set" => {
            let ast_member = ast.member.ok_or_else(|| missing(&id, "member"))?;
            ShapeBody::List {
                member: member("member", ast_member)?,
            }
        }
        "map" => {
            let key = ast.key.ok_or_else(|| missing(&id, "key"))?;
            let value = ast.value.ok_or_else(|| missing(&id, "value"))?;
            ShapeBody::Map {
                key: member("key", key)?,
                value: member("value", value)?,
            }
        }
        "operation" => ShapeBody::Operation {
            input: optional_target(ast.input)?,
            output: optional_target(ast.output)?,
            errors: targets(ast.errors)?,
        },
        "service" => ShapeBody::Service {
            version: ast.version,
            operations: targets(ast.operations)?,
        },
        "string" => ShapeBody::String,
        "enum" => ShapeBody::String,
        "boolean" => ShapeBody::Boolean,
        "blob" => ShapeBody::Blob,
        "timestamp" => ShapeBody::Timestamp,
        "byte" => ShapeBody::Number(NumberType::Byte),
        "short" => ShapeBody::Number(NumberType::Short),
        "integer" => ShapeBody::Number(NumberType::Integer),
        "long" => ShapeBody::Number(NumberType::Long),
        "float" => ShapeBody::Number(NumberType::Float),
        "double" => ShapeBody::Number(NumberType::Double),
        "bigInteger" => ShapeBody::Number(NumberType::BigInteger),
        "bigDecimal" => ShapeBody::Number(NumberType::BigDecimal),
        other => {
            return Err(ModelError::UnsupportedShapeType {
                id,
                kind: other.to_string(),
            });
        }
    };

    let mut traits = parse_traits(&id, &ast.traits)?;
    if let Some(values) = enum_values {
        traits.insert(Trait::Enum(values));
    }

    let mut shape = Shape::new(id, body);
    shape.traits = traits;
    out.push(shape);
    Ok(out)
}

fn missing(id: &ShapeId, property: &str) -> ModelError {
    ModelError::UnsupportedShapeType {
        id: id.clone(),
        kind: format!("shape without `{}`", property),
    }
}

fn optional_target(target: Option<AstTarget>) -> Result<Option<ShapeId>, ModelError> {
    match target {
        Some(t) if t.target != UNIT => Ok(Some(t.target.parse()?)),
        _ => Ok(None),
    }
}

fn targets(targets: Vec<AstTarget>) -> Result<Vec<ShapeId>, ModelError> {
    targets.into_iter().map(|t| t.target.parse()).collect()
}

fn parse_traits(shape: &ShapeId, raw: &IndexMap<String, Value>) -> Result<Traits, ModelError> {
    let mut traits = Traits::new();
    for (trait_id, value) in raw {
        match parse_trait(shape, trait_id, value)? {
            Some(t) => {
                traits.insert(t);
            }
            None if trait_id == ENUM_VALUE => {}
            None => tracing::warn!(%shape, trait_id = %trait_id, "dropping unknown trait"),
        }
    }
    Ok(traits)
}

fn parse_trait(shape: &ShapeId, trait_id: &str, value: &Value) -> Result<Option<Trait>, ModelError> {
    let malformed = |reason: &str| ModelError::MalformedTrait {
        shape: shape.clone(),
        trait_id: trait_id.to_string(),
        reason: reason.to_string(),
    };
    let string = || value.as_str().map(str::to_string).ok_or_else(|| malformed("expected a string"));
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(&format!("expected string field `{}`", name)))
    };
    let shape_id_field = |name: &str| -> Result<ShapeId, ModelError> { field(name)?.parse() };

    if let Some(protocol) = ProtocolId::from_trait_id(trait_id) {
        return Ok(Some(Trait::Protocol(protocol)));
    }

    let parsed = match trait_id {
        id if id == TraitKind::Documentation.id() => Trait::Documentation(string()?),
        id if id == TraitKind::Required.id() => Trait::Required,
        id if id == TraitKind::Streaming.id() => Trait::Streaming,
        id if id == TraitKind::Pattern.id() => Trait::Pattern(string()?),
        id if id == TraitKind::Enum.id() => {
            let entries = value
                .as_array()
                .ok_or_else(|| malformed("expected an array of enum definitions"))?;
            let values = entries
                .iter()
                .map(|entry| {
                    let value = entry
                        .get("value")
                        .and_then(Value::as_str)
                        .ok_or_else(|| malformed("enum definition without `value`"))?;
                    Ok(EnumValue {
                        value: value.to_string(),
                        name: entry.get("name").and_then(Value::as_str).map(str::to_string),
                    })
                })
                .collect::<Result<Vec<_>, ModelError>>()?;
            Trait::Enum(values)
        }
        id if id == TraitKind::Http.id() => {
            let code = match value.get("code") {
                None => 200,
                Some(code) => code
                    .as_u64()
                    .and_then(|c| u16::try_from(c).ok())
                    .ok_or_else(|| malformed("`code` must be an HTTP status code"))?,
            };
            Trait::Http(HttpTrait {
                method: field("method")?.to_string(),
                uri: field("uri")?.to_string(),
                code,
            })
        }
        id if id == TraitKind::Error.id() => match value.as_str() {
            Some("client") => Trait::Error(ErrorFault::Client),
            Some("server") => Trait::Error(ErrorFault::Server),
            _ => return Err(malformed("expected \"client\" or \"server\"")),
        },
        id if id == TraitKind::SyntheticInput.id() => Trait::SyntheticInput {
            operation: shape_id_field("operation")?,
        },
        id if id == TraitKind::SyntheticOutput.id() => Trait::SyntheticOutput {
            operation: shape_id_field("operation")?,
        },
        id if id == TraitKind::RefactoredMember.id() => Trait::RefactoredMember {
            source: shape_id_field("originalSource")?,
        },
        id if id == TraitKind::AllowInvalidXmlRoot.id() => Trait::AllowInvalidXmlRoot,
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}
