//! Operation normalization.
//!
//! Every operation gets its own input and output envelope in the
//! `<namespace>.synthetic` namespace, so code generation can tell an
//! operation's top-level structures apart from user-authored nested types
//! that happen to have the same members.

use crate::{Model, ModelError, Shape, ShapeBody, ShapeId, Trait, TraitKind, Traits};

/// Suffix appended to an operation's namespace for synthetic structures.
pub const SYNTHETIC_NAMESPACE_SUFFIX: &str = ".synthetic";

#[derive(Clone, Copy)]
enum Envelope {
    Input,
    Output,
}

impl Envelope {
    fn suffix(self) -> &'static str {
        match self {
            Envelope::Input => "Input",
            Envelope::Output => "Output",
        }
    }

    fn marker(self, operation: &ShapeId) -> Trait {
        let operation = operation.clone();
        match self {
            Envelope::Input => Trait::SyntheticInput { operation },
            Envelope::Output => Trait::SyntheticOutput { operation },
        }
    }

    fn is_marked(self, traits: &Traits) -> bool {
        match self {
            Envelope::Input => traits.has(TraitKind::SyntheticInput),
            Envelope::Output => traits.has(TraitKind::SyntheticOutput),
        }
    }
}

/// Id of the synthetic input or output structure of `operation`.
pub fn synthetic_id(operation: &ShapeId, output: bool) -> ShapeId {
    let envelope = if output { Envelope::Output } else { Envelope::Input };
    ShapeId::new(
        format!("{}{}", operation.namespace(), SYNTHETIC_NAMESPACE_SUFFIX),
        format!("{}{}", operation.name(), envelope.suffix()),
    )
}

/// Give every operation a dedicated synthetic input and output structure.
///
/// Members are copied in declaration order and carry a
/// [`Trait::RefactoredMember`] pointing at the member they were copied
/// from. Operations without input or output get empty envelopes. The
/// original structures stay in the model. Running this twice is a no-op.
pub fn normalize_operations(model: &Model) -> Result<Model, ModelError> {
    let mut builder = model.to_builder();

    let operations: Vec<&Shape> = model.shapes().filter(|s| s.is_operation()).collect();
    for operation in operations {
        let ShapeBody::Operation {
            input,
            output,
            errors,
        } = &operation.body
        else {
            continue;
        };

        let new_input = envelope(model, &mut builder, &operation.id, input.as_ref(), Envelope::Input)?;
        let new_output =
            envelope(model, &mut builder, &operation.id, output.as_ref(), Envelope::Output)?;

        let mut rewritten = operation.clone();
        rewritten.body = ShapeBody::Operation {
            input: Some(new_input),
            output: Some(new_output),
            errors: errors.clone(),
        };
        builder.insert(rewritten);
        tracing::debug!(operation = %operation.id, "normalized operation");
    }

    builder.build()
}

fn envelope(
    model: &Model,
    builder: &mut crate::ModelBuilder,
    operation: &ShapeId,
    original: Option<&ShapeId>,
    kind: Envelope,
) -> Result<ShapeId, ModelError> {
    let source = original.map(|id| model.expect_shape(id)).transpose()?;
    if let Some(source) = source.filter(|s| kind.is_marked(&s.traits)) {
        return Ok(source.id.clone());
    }

    let id = synthetic_id(operation, matches!(kind, Envelope::Output));
    let mut traits = source.map(|s| s.traits.clone()).unwrap_or_default();
    traits.remove(TraitKind::SyntheticInput);
    traits.remove(TraitKind::SyntheticOutput);
    traits.insert(kind.marker(operation));

    let mut members = Vec::new();
    for member_id in source.map(Shape::members).unwrap_or_default() {
        let member = model.expect_shape(member_id)?;
        let Some((_, target)) = member.as_member() else {
            continue;
        };
        let name = member_id.member().unwrap_or_else(|| member_id.name());
        let copied_id = id.with_member(name);

        let mut copied = Shape::member(copied_id.clone(), target.clone());
        copied.traits = member.traits.clone();
        copied.traits.insert(Trait::RefactoredMember {
            source: member_id.clone(),
        });
        builder.insert(copied);
        members.push(copied_id);
    }

    let mut structure = Shape::structure(id.clone(), members);
    structure.traits = traits;
    builder.insert(structure);
    Ok(id)
}
