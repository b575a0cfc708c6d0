//! Type model definitions.
//!
//! This module contains the data structures describing the C-like types a
//! generator run operates on: builtins, bitfields, references, arrays,
//! structs, unions and keyed unions.

use std::collections::HashMap;
use std::sync::Arc;

/// Convention used when passing an instance of a type to a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassBy {
    /// Instances are passed by value.
    #[default]
    Value,
    /// Instances are passed through a pointer.
    Reference,
}

impl PassBy {
    /// Parses a pass convention from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "value" | "by-value" => Some(Self::Value),
            "reference" | "by-reference" | "ref" => Some(Self::Reference),
            _ => None,
        }
    }
}

/// Struct or union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    /// C `struct`.
    Struct,
    /// C `union`.
    Union,
}

impl AggregateKind {
    /// Returns the C keyword for this kind.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }
}

/// Length of an array type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLength {
    /// Fixed number of elements, stored inline.
    Fixed(usize),
    /// Element count held in a sibling field; storage is a pointer.
    Counted,
}

/// A type node.
#[derive(Debug, Clone)]
pub struct Type {
    /// C spelling of the type. `None` for anonymous aggregates.
    pub typename: Option<String>,
    /// Documentation text.
    pub comment: Option<String>,
    /// Convention for passing instances to functions.
    pub passby: PassBy,
    /// Function releasing the resources owned by an instance.
    pub destructor_fn: Option<String>,
    /// Whether the body of `destructor_fn` is generated.
    pub autogenerate_destructor: bool,
    /// Variant-specific data.
    pub kind: TypeKind,
}

/// Type variants.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Primitive leaf such as `int` or `char *`.
    Builtin,
    /// Primitive with an explicit width in bits.
    BitField {
        /// Width in bits.
        width: u32,
    },
    /// One level of indirection to another type.
    Reference(Arc<Type>),
    /// Sequence of an element type.
    Array {
        /// Element type.
        element: Arc<Type>,
        /// Fixed or counted length.
        length: ArrayLength,
    },
    /// Struct or union.
    Aggregate(Aggregate),
    /// Union discriminated by a field on the enclosing struct.
    KeyedUnion(KeyedUnion),
}

impl Type {
    fn with_kind(typename: Option<String>, passby: PassBy, kind: TypeKind) -> Self {
        Self {
            typename,
            comment: None,
            passby,
            destructor_fn: None,
            autogenerate_destructor: false,
            kind,
        }
    }

    /// Creates a builtin type passed by value.
    #[must_use]
    pub fn builtin(typename: impl Into<String>) -> Self {
        Self::with_kind(Some(typename.into()), PassBy::Value, TypeKind::Builtin)
    }

    /// Creates a bitfield over the given primitive spelling.
    #[must_use]
    pub fn bitfield(typename: impl Into<String>, width: u32) -> Self {
        Self::with_kind(
            Some(typename.into()),
            PassBy::Value,
            TypeKind::BitField { width },
        )
    }

    /// Creates a reference to `target`. Its typename is the target's followed by ` *`.
    #[must_use]
    pub fn reference(target: Arc<Type>) -> Self {
        let typename = target.typename.as_ref().map(|name| format!("{} *", name));
        Self::with_kind(typename, PassBy::Value, TypeKind::Reference(target))
    }

    /// Creates an array of `element`.
    #[must_use]
    pub fn array(element: Arc<Type>, length: ArrayLength) -> Self {
        let typename = element.typename.clone();
        Self::with_kind(typename, PassBy::Value, TypeKind::Array { element, length })
    }

    /// Creates a struct. Pass `None` for an anonymous inline struct.
    #[must_use]
    pub fn structure(typename: Option<String>, fields: Vec<Field>) -> Self {
        Self::with_kind(
            typename,
            PassBy::Reference,
            TypeKind::Aggregate(Aggregate::new(AggregateKind::Struct, fields)),
        )
    }

    /// Creates a plain union. Pass `None` for an anonymous inline union.
    #[must_use]
    pub fn union(typename: Option<String>, fields: Vec<Field>) -> Self {
        Self::with_kind(
            typename,
            PassBy::Reference,
            TypeKind::Aggregate(Aggregate::new(AggregateKind::Union, fields)),
        )
    }

    /// Creates a keyed union discriminated by `keyvar_name` on the enclosing struct.
    #[must_use]
    pub fn keyed_union(
        typename: Option<String>,
        keyvar_name: impl Into<String>,
        fields: Vec<KeyedField>,
    ) -> Self {
        Self::with_kind(
            typename,
            PassBy::Reference,
            TypeKind::KeyedUnion(KeyedUnion {
                keyvar_name: keyvar_name.into(),
                fields,
            }),
        )
    }

    /// Sets the destructor function.
    #[must_use]
    pub fn with_destructor(mut self, destructor_fn: impl Into<String>) -> Self {
        self.destructor_fn = Some(destructor_fn.into());
        self
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the pass convention.
    #[must_use]
    pub fn pass_by(mut self, passby: PassBy) -> Self {
        self.passby = passby;
        self
    }

    /// Sets whether the destructor body is generated.
    #[must_use]
    pub fn autogenerate(mut self, autogenerate: bool) -> Self {
        self.autogenerate_destructor = autogenerate;
        self
    }

    /// Returns the typename, or `"<anonymous>"` for diagnostics.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.typename.as_deref().unwrap_or("<anonymous>")
    }

    /// Returns true if this type has no typename.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.typename.is_none()
    }

    /// Returns true if this is a struct, union or keyed union.
    #[must_use]
    pub const fn is_aggregate(&self) -> bool {
        matches!(self.kind, TypeKind::Aggregate(_) | TypeKind::KeyedUnion(_))
    }

    /// Returns true if this type is a struct.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        matches!(&self.kind, TypeKind::Aggregate(agg) if agg.kind == AggregateKind::Struct)
    }

    /// Returns true if a destructor body should be generated for this type.
    #[must_use]
    pub fn has_generated_destructor(&self) -> bool {
        self.destructor_fn.is_some() && self.autogenerate_destructor
    }
}

/// Ordered field list of a struct or union.
#[derive(Debug, Clone)]
pub struct Aggregate {
    /// Struct or union.
    pub kind: AggregateKind,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl Aggregate {
    /// Creates a new aggregate.
    #[must_use]
    pub fn new(kind: AggregateKind, fields: Vec<Field>) -> Self {
        Self { kind, fields }
    }
}

/// A member of an aggregate.
#[derive(Debug, Clone)]
pub struct Field {
    /// Member name. `None` splices an anonymous aggregate inline.
    pub name: Option<String>,
    /// Member type.
    pub ty: Arc<Type>,
    /// Const members are borrowed and never destroyed.
    pub is_const: bool,
    /// Documentation text.
    pub comment: Option<String>,
}

impl Field {
    /// Creates a named field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Arc<Type>) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            is_const: false,
            comment: None,
        }
    }

    /// Creates an unnamed field splicing `ty` inline.
    #[must_use]
    pub fn anonymous(ty: Arc<Type>) -> Self {
        Self {
            name: None,
            ty,
            is_const: false,
            comment: None,
        }
    }

    /// Marks the field const.
    #[must_use]
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Union whose active member is selected by a discriminant on the enclosing struct.
#[derive(Debug, Clone)]
pub struct KeyedUnion {
    /// Name of the discriminant field on the enclosing struct.
    pub keyvar_name: String,
    /// Members with their selection guards.
    pub fields: Vec<KeyedField>,
}

/// A keyed union member.
#[derive(Debug, Clone)]
pub struct KeyedField {
    /// The member itself.
    pub field: Field,
    /// Test for "this member is active".
    pub keyvar_expr: KeyvarTemplate,
}

impl KeyedField {
    /// Creates a keyed member.
    #[must_use]
    pub fn new(field: Field, keyvar_expr: impl Into<String>) -> Self {
        Self {
            field,
            keyvar_expr: KeyvarTemplate::new(keyvar_expr),
        }
    }
}

/// Discriminant test with a single `%s` placeholder for the discriminant access path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyvarTemplate(String);

impl KeyvarTemplate {
    /// Placeholder substituted with the discriminant access path.
    pub const PLACEHOLDER: &'static str = "%s";

    /// Wraps a template string. Well-formedness is checked by [`Self::render`].
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Returns the raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes `access` for the placeholder. `%%` renders as a literal `%`.
    ///
    /// Returns `None` unless the template holds exactly one placeholder and no
    /// other `%` directive.
    #[must_use]
    pub fn render(&self, access: &str) -> Option<String> {
        let mut output = String::with_capacity(self.0.len() + access.len());
        let mut placeholders = 0;
        let mut chars = self.0.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                output.push(c);
                continue;
            }
            match chars.next()? {
                '%' => output.push('%'),
                's' => {
                    placeholders += 1;
                    output.push_str(access);
                }
                _ => return None,
            }
        }

        (placeholders == 1).then_some(output)
    }
}

/// The set of top-level types of a generator run.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    /// Top-level types in declaration order.
    pub types: Vec<Arc<Type>>,
    /// Lookup map from typename to index.
    type_map: HashMap<String, usize>,
}

impl TypeModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level type.
    pub fn add_type(&mut self, ty: Arc<Type>) {
        if let Some(name) = &ty.typename {
            self.type_map.insert(name.clone(), self.types.len());
        }
        self.types.push(ty);
    }

    /// Looks up a top-level type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&Arc<Type>> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Returns true if a top-level type with the given name exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Returns the number of top-level types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the model holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_typename() {
        let target = Arc::new(Type::structure(Some("libxl_foo".to_string()), vec![]));
        let reference = Type::reference(target);
        assert_eq!(reference.typename.as_deref(), Some("libxl_foo *"));
        assert_eq!(reference.passby, PassBy::Value);
    }

    #[test]
    fn test_default_passby() {
        assert_eq!(Type::builtin("int").passby, PassBy::Value);
        assert_eq!(Type::structure(None, vec![]).passby, PassBy::Reference);
        assert_eq!(
            Type::keyed_union(None, "kind", vec![]).passby,
            PassBy::Reference
        );
    }

    #[test]
    fn test_keyvar_template_render() {
        let template = KeyvarTemplate::new("%s == LIBXL_KIND_A");
        assert_eq!(
            template.render("p->kind").as_deref(),
            Some("p->kind == LIBXL_KIND_A")
        );
    }

    #[test]
    fn test_keyvar_template_malformed() {
        assert!(KeyvarTemplate::new("kind == 0").render("p->kind").is_none());
        assert!(KeyvarTemplate::new("%s == %s").render("p->kind").is_none());
        assert!(KeyvarTemplate::new("%s == %d").render("p->kind").is_none());
        assert!(KeyvarTemplate::new("%s %").render("p->kind").is_none());
        assert!(KeyvarTemplate::new("%%s == 0").render("p->kind").is_none());
    }

    #[test]
    fn test_keyvar_template_literal_percent() {
        let template = KeyvarTemplate::new("%s %% 2 == 0");
        assert_eq!(template.render("p->k").as_deref(), Some("p->k % 2 == 0"));
    }

    #[test]
    fn test_generated_destructor_requires_both() {
        let ty = Type::structure(Some("a".to_string()), vec![]).with_destructor("a_destroy");
        assert!(!ty.has_generated_destructor());
        assert!(ty.autogenerate(true).has_generated_destructor());
    }

    #[test]
    fn test_type_model_lookup() {
        let mut model = TypeModel::new();
        model.add_type(Arc::new(Type::structure(Some("a".to_string()), vec![])));
        model.add_type(Arc::new(Type::union(Some("b".to_string()), vec![])));

        assert_eq!(model.len(), 2);
        assert!(model.has_type("b"));
        assert!(!model.has_type("c"));
        assert!(model.get_type("a").expect("type a").is_struct());
    }

    #[test]
    fn test_passby_parse() {
        assert_eq!(PassBy::parse("reference"), Some(PassBy::Reference));
        assert_eq!(PassBy::parse("Value"), Some(PassBy::Value));
        assert_eq!(PassBy::parse("pointer"), None);
    }
}
