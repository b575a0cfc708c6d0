//! Destructor code generation.
//!
//! [`destroy`] walks a type and yields the statements releasing every
//! resource owned by an instance. Fields are visited in declaration order,
//! const fields are skipped, and keyed union members are guarded by their
//! discriminant test against the enclosing instance.

use crate::c::stmt::{self, Stmt};
use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use idlgen_model::{AggregateKind, Field, PassBy, Type, TypeKind};

/// Generator for autogenerated destructor definitions.
pub struct DestructorGenerator<'a> {
    ty: &'a Type,
    config: &'a GeneratorConfig,
}

impl<'a> DestructorGenerator<'a> {
    /// Creates a new destructor generator for a top-level type.
    #[must_use]
    pub fn new(ty: &'a Type, config: &'a GeneratorConfig) -> Self {
        Self { ty, config }
    }

    /// Generates the destructor function definition.
    ///
    /// The instance parameter `p` is always a pointer. After the synthesized
    /// statements the whole instance is overwritten with the poison byte.
    ///
    /// # Errors
    /// Returns `CodegenError` if the type has no destructor or name, or if
    /// synthesis fails.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let typename = self.ty.typename.as_deref().ok_or_else(|| {
            CodegenError::unsupported(self.ty.display_name(), "top-level types must be named")
        })?;
        let destructor_fn = self.ty.destructor_fn.as_deref().ok_or_else(|| {
            CodegenError::generation(format!("type '{}' has no destructor function", typename))
        })?;
        // Any other type would be destroyed by calling `destructor_fn` itself.
        if !self.ty.is_struct() {
            return Err(CodegenError::unsupported(
                typename,
                "only structs can have generated destructors",
            ));
        }

        let body = destroy(self.ty, "p", true, None)?;

        let mut output = String::new();
        output.push_str(&format!("void {}({} *p)\n", destructor_fn, typename));
        output.push_str("{\n");
        output.push_str(&stmt::render(&body, 1));
        output.push_str(&format!(
            "{}memset(p, {}, sizeof(*p));\n",
            stmt::INDENT,
            self.config.poison_macro
        ));
        output.push_str("}\n");

        Ok(output)
    }
}

/// Synthesizes the statements destroying the instance `v` of type `ty`.
///
/// # Arguments
/// * `ty` - Type of the instance
/// * `v` - C expression denoting the instance
/// * `reference` - Whether `v` is a pointer to the instance
/// * `parent` - Member access prefix of the enclosing instance (`p->`, `s.`),
///   required to read keyed union discriminants
///
/// # Errors
/// Returns `CodegenError::MissingParent` for a keyed union without an
/// enclosing instance and `CodegenError::MalformedTemplate` for a bad
/// discriminant template.
pub fn destroy(
    ty: &Type,
    v: &str,
    reference: bool,
    parent: Option<&str>,
) -> Result<Vec<Stmt>, CodegenError> {
    let deref = if reference {
        format!("{}->", v)
    } else {
        format!("{}.", v)
    };

    match &ty.kind {
        TypeKind::KeyedUnion(ku) => {
            let parent = parent.ok_or_else(|| CodegenError::MissingParent {
                type_name: ty.display_name().to_string(),
                instance: v.to_string(),
            })?;
            let keyvar = format!("{}{}", parent, ku.keyvar_name);

            let mut stmts = Vec::new();
            for keyed in ku.fields.iter().filter(|kf| !kf.field.is_const) {
                let guard = keyed.keyvar_expr.render(&keyvar).ok_or_else(|| {
                    CodegenError::MalformedTemplate {
                        field: field_label(&keyed.field),
                        template: keyed.keyvar_expr.as_str().to_string(),
                    }
                })?;
                tracing::trace!(guard = %guard, "keyed union member");
                let body = destroy_member(&keyed.field, v, reference, &deref)?;
                stmts.push(Stmt::If { guard, body });
            }
            Ok(stmts)
        }
        TypeKind::Reference(target) => destroy(target, v, true, Some(v)),
        TypeKind::Aggregate(agg)
            if agg.kind == AggregateKind::Struct
                && (parent.is_none() || ty.destructor_fn.is_none()) =>
        {
            let mut stmts = Vec::new();
            for field in agg.fields.iter().filter(|f| !f.is_const) {
                stmts.extend(destroy_member(field, v, reference, &deref)?);
            }
            Ok(stmts)
        }
        TypeKind::BitField { .. } => Ok(Vec::new()),
        TypeKind::Builtin | TypeKind::Array { .. } | TypeKind::Aggregate(_) => {
            Ok(call_destructor(ty, v, reference).into_iter().collect())
        }
    }
}

/// Destroys one member of the instance `v`.
///
/// Named members are reached through `deref`; an anonymous member shares
/// the storage of `v` and is destroyed through `v` itself.
fn destroy_member(
    field: &Field,
    v: &str,
    reference: bool,
    deref: &str,
) -> Result<Vec<Stmt>, CodegenError> {
    match &field.name {
        Some(name) => destroy(&field.ty, &format!("{}{}", deref, name), false, Some(deref)),
        None => destroy(&field.ty, v, reference, Some(deref)),
    }
}

/// Emits `destructor_fn(v)`, taking the address when the type is passed by
/// reference and `v` is held by value.
fn call_destructor(ty: &Type, v: &str, reference: bool) -> Option<Stmt> {
    let destructor_fn = ty.destructor_fn.as_ref()?;
    let makeref = if ty.passby == PassBy::Reference && !reference {
        "&"
    } else {
        ""
    };
    Some(Stmt::call(destructor_fn, format!("{}{}", makeref, v)))
}

fn field_label(field: &Field) -> String {
    field
        .name
        .clone()
        .unwrap_or_else(|| "<anonymous>".to_string())
}
