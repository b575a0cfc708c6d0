//! Type declaration generation.
//!
//! Declarations are built as lists of lines. Nested anonymous aggregates are
//! spliced by prefixing each of their lines with one indentation level.

use crate::c::comment::comment_lines;
use crate::c::stmt::INDENT;
use crate::error::CodegenError;
use idlgen_model::{ArrayLength, Field, Type, TypeKind};

/// Generator for type declarations and destructor prototypes.
pub struct DeclarationGenerator<'a> {
    ty: &'a Type,
}

impl<'a> DeclarationGenerator<'a> {
    /// Creates a new declaration generator for a top-level type.
    #[must_use]
    pub fn new(ty: &'a Type) -> Self {
        Self { ty }
    }

    /// Generates the declaration terminated by `;`, followed by the
    /// destructor prototype when the type has a destructor.
    ///
    /// # Errors
    /// Returns `CodegenError` if the type is not a named aggregate or a
    /// nested field cannot be rendered.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let typename = self.ty.typename.as_deref().ok_or_else(|| {
            CodegenError::unsupported(self.ty.display_name(), "top-level types must be named")
        })?;

        let mut output = type_define(self.ty)?;
        output.push_str(";\n");

        if let Some(destructor_fn) = &self.ty.destructor_fn {
            output.push_str(&prototype(destructor_fn, typename));
        }

        Ok(output)
    }
}

/// Returns the destructor prototype line for `typename`.
#[must_use]
pub fn prototype(destructor_fn: &str, typename: &str) -> String {
    format!("void {}({} *p);\n", destructor_fn, typename)
}

/// Renders the full declaration of an aggregate, without the trailing `;`.
///
/// # Errors
/// Returns `CodegenError::UnsupportedType` for non-aggregate types.
pub fn type_define(ty: &Type) -> Result<String, CodegenError> {
    Ok(define_lines(ty)?.join("\n"))
}

/// Renders a field of type `ty` named `name`, without the trailing `;`.
///
/// # Errors
/// Returns `CodegenError` if `name` is absent for a type that cannot be
/// spliced anonymously, or a nested type cannot be rendered.
pub fn instance_of(ty: &Type, name: Option<&str>) -> Result<String, CodegenError> {
    Ok(instance_lines(ty, name)?.join("\n"))
}

fn define_lines(ty: &Type) -> Result<Vec<String>, CodegenError> {
    let (keyword, fields): (&str, Vec<&Field>) = match &ty.kind {
        TypeKind::Aggregate(agg) => (agg.kind.keyword(), agg.fields.iter().collect()),
        TypeKind::KeyedUnion(ku) => ("union", ku.fields.iter().map(|kf| &kf.field).collect()),
        TypeKind::Builtin
        | TypeKind::BitField { .. }
        | TypeKind::Reference(_)
        | TypeKind::Array { .. } => {
            return Err(CodegenError::unsupported(
                ty.display_name(),
                "only structs and unions can be declared",
            ));
        }
    };

    let mut lines = Vec::new();

    if let Some(comment) = &ty.comment {
        lines.extend(comment_lines(0, comment));
    }

    match &ty.typename {
        Some(_) => lines.push(format!("typedef {} {{", keyword)),
        None => lines.push(format!("{} {{", keyword)),
    }

    for field in fields {
        if let Some(comment) = &field.comment {
            lines.extend(comment_lines(INDENT.len(), comment));
        }

        let mut member = instance_lines(&field.ty, field.name.as_deref())?;
        if field.is_const {
            // Qualify the declarator line, not a leading comment.
            let at = member
                .iter()
                .position(|line| !line.starts_with("/*") && !line.starts_with(" *"))
                .unwrap_or(0);
            member[at].insert_str(0, "const ");
        }
        if let Some(last) = member.last_mut() {
            last.push(';');
        }
        lines.extend(member.into_iter().map(|line| format!("{}{}", INDENT, line)));
    }

    match &ty.typename {
        Some(typename) => lines.push(format!("}} {}", typename)),
        None => lines.push("}".to_string()),
    }

    Ok(lines)
}

fn instance_lines(ty: &Type, name: Option<&str>) -> Result<Vec<String>, CodegenError> {
    if ty.is_aggregate() && ty.is_anonymous() {
        let mut lines = define_lines(ty)?;
        if let (Some(name), Some(last)) = (name, lines.last_mut()) {
            last.push(' ');
            last.push_str(name);
        }
        return Ok(lines);
    }

    let name = name.ok_or_else(|| CodegenError::UnnamedField {
        type_name: ty.display_name().to_string(),
    })?;

    let line = match &ty.kind {
        TypeKind::BitField { width } => format!("{} {}:{}", c_type_of(ty)?, name, width),
        TypeKind::Array { element, length } => match length {
            ArrayLength::Fixed(len) => format!("{} {}[{}]", c_type_of(element)?, name, len),
            ArrayLength::Counted => format!("{} *{}", c_type_of(element)?, name),
        },
        TypeKind::Builtin
        | TypeKind::Reference(_)
        | TypeKind::Aggregate(_)
        | TypeKind::KeyedUnion(_) => format!("{} {}", c_type_of(ty)?, name),
    };

    Ok(vec![line])
}

/// Returns the C spelling of a named type.
fn c_type_of(ty: &Type) -> Result<&str, CodegenError> {
    ty.typename.as_deref().ok_or_else(|| {
        CodegenError::unsupported(ty.display_name(), "anonymous type used by name")
    })
}
