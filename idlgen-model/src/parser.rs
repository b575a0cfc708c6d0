//! XML IDL loader.
//!
//! This module parses the XML interface description into a [`TypeModel`].
//!
//! ```xml
//! <types>
//!     <builtin name="libxl_string" ctype="char *" destructor="free"/>
//!     <struct name="libxl_box" destructor="libxl_box_destroy">
//!         <field name="id" type="int" const="true"/>
//!         <field name="name" type="libxl_string"/>
//!         <field name="kind" type="int"/>
//!         <keyed_union name="payload" keyvar="kind">
//!             <field name="a" type="int" when="%s == 0"/>
//!             <field name="b" type="libxl_string" when="%s == 1"/>
//!         </keyed_union>
//!     </struct>
//! </types>
//! ```

use crate::error::ParseError;
use crate::types::{ArrayLength, Field, KeyedField, PassBy, Type, TypeModel};
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::collections::HashMap;
use std::sync::Arc;

/// C scalar spellings available to every IDL without declaration.
pub const STANDARD_BUILTINS: &[&str] = &[
    "void",
    "void *",
    "char",
    "char *",
    "const char *",
    "signed char",
    "unsigned char",
    "short",
    "unsigned short",
    "int",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "bool",
    "size_t",
    "ssize_t",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "intptr_t",
    "uintptr_t",
];

/// Names resolvable from `type` attributes while parsing.
struct Registry {
    types: HashMap<String, Arc<Type>>,
}

impl Registry {
    fn new() -> Self {
        let types = STANDARD_BUILTINS
            .iter()
            .map(|name| ((*name).to_string(), Arc::new(Type::builtin(*name))))
            .collect();
        Self { types }
    }

    fn insert(&mut self, name: &str, ty: Arc<Type>) -> Result<(), ParseError> {
        if self.types.contains_key(name) {
            return Err(ParseError::duplicate("type", name));
        }
        self.types.insert(name.to_string(), ty);
        Ok(())
    }

    fn resolve(&self, type_name: &str, owner: &str, field: &str) -> Result<Arc<Type>, ParseError> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| ParseError::UnknownType {
                type_name: type_name.to_string(),
                owner: owner.to_string(),
                field: field.to_string(),
            })
    }
}

/// Attributes shared by builtin and aggregate elements.
#[derive(Default)]
struct TypeAttrs {
    name: Option<String>,
    ctype: Option<String>,
    comment: Option<String>,
    destructor: Option<String>,
    passby: Option<PassBy>,
    autogenerate: Option<bool>,
    keyvar: Option<String>,
    when: Option<String>,
}

impl TypeAttrs {
    fn read(element: &str, e: &BytesStart<'_>, decoder: Decoder) -> Result<Self, ParseError> {
        let mut attrs = Self::default();

        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr.decode_and_unescape_value(decoder)?;
            let value: &str = &value;

            match key {
                "name" => attrs.name = Some(value.to_string()),
                "ctype" => attrs.ctype = Some(value.to_string()),
                "comment" => attrs.comment = Some(value.to_string()),
                "destructor" => attrs.destructor = Some(value.to_string()),
                "passby" => {
                    attrs.passby = Some(
                        PassBy::parse(value)
                            .ok_or_else(|| ParseError::invalid_attr(element, "passby", value))?,
                    )
                }
                "autogenerate" => attrs.autogenerate = Some(parse_bool(element, key, value)?),
                "keyvar" => attrs.keyvar = Some(value.to_string()),
                "when" => attrs.when = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(attrs)
    }

    /// Applies the common type attributes to `ty`.
    fn apply(self, mut ty: Type, autogenerate_default: bool) -> Type {
        ty.autogenerate_destructor = self
            .autogenerate
            .unwrap_or(autogenerate_default && self.destructor.is_some());
        ty.destructor_fn = self.destructor;
        ty.comment = self.comment;
        if let Some(passby) = self.passby {
            ty.passby = passby;
        }
        ty
    }
}

/// Parses an XML IDL document into a type model.
///
/// # Arguments
/// * `xml` - IDL content
///
/// # Returns
/// The top-level aggregate types in declaration order.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, references an unknown type
/// or contains invalid IDL elements.
pub fn parse_idl(xml: &str) -> Result<TypeModel, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut model: Option<TypeModel> = None;
    let mut registry = Registry::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "types" if model.is_none() => {
                        let mut types = TypeModel::new();
                        parse_types(&mut reader, &mut types, &mut registry)?;
                        model = Some(types);
                    }
                    "types" => return Err(ParseError::duplicate("element", "types")),
                    _ => return Err(ParseError::unknown_element(name, "document")),
                }
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"types" => {
                model.get_or_insert_with(TypeModel::new);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    model.ok_or_else(|| ParseError::malformed("types", "document has no <types> element"))
}

/// Parses an XML IDL file into a type model.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_idl_file(path: &std::path::Path) -> Result<TypeModel, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_idl(&xml)
}

/// Parses the children of the types element.
fn parse_types(
    reader: &mut Reader<&[u8]>,
    model: &mut TypeModel,
    registry: &mut Registry,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let (e, has_children) = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => (e.into_owned(), true),
            Ok(Event::Empty(e)) => (e.into_owned(), false),
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::malformed("types", "element is never closed"));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => continue,
        };

        let name_bytes = e.name().as_ref().to_vec();
        let tag_name = std::str::from_utf8(&name_bytes)?;
        match tag_name {
            "builtin" => {
                let (name, ty) = parse_builtin(&e, reader.decoder())?;
                if has_children {
                    skip_to_end(reader)?;
                }
                registry.insert(&name, Arc::new(ty))?;
            }
            "struct" | "union" | "keyed_union" => {
                let (attrs, ty) = parse_aggregate(reader, &e, tag_name, has_children, registry)?;
                let name = attrs
                    .name
                    .clone()
                    .ok_or_else(|| ParseError::missing_attr(tag_name, "name"))?;
                // Only structs are walked; any other type's destructor is external.
                let ty = Arc::new(attrs.apply(named(ty, &name), tag_name == "struct"));
                registry.insert(&name, ty.clone())?;
                model.add_type(ty);
            }
            other => return Err(ParseError::unknown_element(other, "types")),
        }
    }

    Ok(())
}

fn named(mut ty: Type, name: &str) -> Type {
    ty.typename = Some(name.to_string());
    ty
}

/// Parses a builtin declaration.
fn parse_builtin(e: &BytesStart<'_>, decoder: Decoder) -> Result<(String, Type), ParseError> {
    let mut attrs = TypeAttrs::read("builtin", e, decoder)?;
    let name = attrs
        .name
        .take()
        .ok_or_else(|| ParseError::missing_attr("builtin", "name"))?;
    let ctype = attrs.ctype.take().unwrap_or_else(|| name.clone());

    Ok((name, attrs.apply(Type::builtin(ctype), false)))
}

/// Parses a struct, union or keyed union body.
///
/// The returned type is anonymous; the caller decides whether the `name`
/// attribute names the type or the field holding it.
fn parse_aggregate(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    tag_name: &str,
    has_children: bool,
    registry: &Registry,
) -> Result<(TypeAttrs, Type), ParseError> {
    let mut attrs = TypeAttrs::read(tag_name, e, reader.decoder())?;
    let keyvar = if tag_name == "keyed_union" {
        Some(
            attrs
                .keyvar
                .take()
                .ok_or_else(|| ParseError::missing_attr(tag_name, "keyvar"))?,
        )
    } else {
        None
    };

    let owner = match &attrs.name {
        Some(name) => format!("{} {}", tag_name, name),
        None => format!("anonymous {}", tag_name),
    };
    let mut members: Vec<(Field, Option<String>)> = Vec::new();
    let mut comment = None;

    if has_children {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let (child, child_has_children) = match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => (e.into_owned(), true),
                Ok(Event::Empty(e)) => (e.into_owned(), false),
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ParseError::malformed(tag_name, "element is never closed"));
                }
                Err(e) => return Err(ParseError::Xml(e)),
                _ => continue,
            };

            let name_bytes = child.name().as_ref().to_vec();
            let child_name = std::str::from_utf8(&name_bytes)?;
            match child_name {
                "field" => {
                    members.push(parse_field(
                        reader,
                        &child,
                        child_has_children,
                        &owner,
                        registry,
                    )?);
                }
                "struct" | "union" | "keyed_union" => {
                    let (mut nested_attrs, nested) =
                        parse_aggregate(reader, &child, child_name, child_has_children, registry)?;
                    let field_name = nested_attrs.name.take();
                    let when = nested_attrs.when.take();
                    let field_comment = nested_attrs.comment.take();
                    let ty = Arc::new(nested_attrs.apply(nested, false));
                    let mut field = match field_name {
                        Some(name) => Field::new(name, ty),
                        None => Field::anonymous(ty),
                    };
                    field.comment = field_comment;
                    members.push((field, when));
                }
                "comment" if child_has_children => comment = Some(read_text(reader)?),
                "comment" => {}
                other => return Err(ParseError::unknown_element(other, tag_name)),
            }
        }
    }

    if comment.is_some() {
        attrs.comment = comment;
    }

    let ty = match keyvar {
        Some(keyvar) => {
            let fields = members
                .into_iter()
                .map(|(field, when)| {
                    let when = when.ok_or_else(|| ParseError::missing_attr("field", "when"))?;
                    Ok(KeyedField::new(field, when))
                })
                .collect::<Result<Vec<_>, ParseError>>()?;
            Type::keyed_union(None, keyvar, fields)
        }
        None => {
            let fields = members.into_iter().map(|(field, _)| field).collect();
            match tag_name {
                "union" => Type::union(None, fields),
                _ => Type::structure(None, fields),
            }
        }
    };
    Ok((attrs, ty))
}

/// Parses a field element. Returns the field and its keyed union guard, if any.
fn parse_field(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
    owner: &str,
    registry: &Registry,
) -> Result<(Field, Option<String>), ParseError> {
    let mut name = None;
    let mut type_name = None;
    let mut is_const = false;
    let mut comment = None;
    let mut width = None;
    let mut reference = false;
    let mut length = None;
    let mut when = None;

    let decoder = reader.decoder();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.decode_and_unescape_value(decoder)?;
        let value: &str = &value;

        match key {
            "name" => name = Some(value.to_string()),
            "type" => type_name = Some(value.to_string()),
            "const" => is_const = parse_bool("field", key, value)?,
            "comment" => comment = Some(value.to_string()),
            "width" => {
                width = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| ParseError::invalid_attr("field", "width", value))?,
                )
            }
            "reference" => reference = parse_bool("field", key, value)?,
            "length" => {
                length = Some(match value {
                    "counted" => ArrayLength::Counted,
                    _ => ArrayLength::Fixed(
                        value
                            .parse()
                            .map_err(|_| ParseError::invalid_attr("field", "length", value))?,
                    ),
                })
            }
            "when" => when = Some(value.to_string()),
            _ => {}
        }
    }

    if has_children {
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref c)) if c.name().as_ref() == b"comment" => {
                    comment = Some(read_text(reader)?);
                }
                Ok(Event::Start(ref c)) | Ok(Event::Empty(ref c)) => {
                    let child = std::str::from_utf8(c.name().as_ref())?.to_string();
                    return Err(ParseError::unknown_element(child, "field"));
                }
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => {
                    return Err(ParseError::malformed("field", "element is never closed"));
                }
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("field", "type"))?;
    let field_label = name.clone().unwrap_or_default();
    let base = registry.resolve(&type_name, owner, &field_label)?;

    let ty = match (width, length, reference) {
        (Some(width), None, false) => {
            let spelling = base.typename.clone().unwrap_or(type_name);
            Arc::new(Type::bitfield(spelling, width))
        }
        (Some(_), _, _) => {
            return Err(ParseError::malformed(
                "field",
                format!("bitfield '{}' cannot be an array or a reference", field_label),
            ));
        }
        (None, Some(length), false) => Arc::new(Type::array(base, length)),
        (None, Some(_), true) => {
            return Err(ParseError::malformed(
                "field",
                format!("'{}' cannot be both an array and a reference", field_label),
            ));
        }
        (None, None, true) => Arc::new(Type::reference(base)),
        (None, None, false) => base,
    };

    let mut field = match name {
        Some(name) => Field::new(name, ty),
        None => Field::anonymous(ty),
    };
    field.is_const = is_const;
    field.comment = comment;

    Ok((field, when))
}

/// Reads the text content of the current element, one trimmed line per source line.
///
/// Text is read untrimmed so that whitespace next to entity references
/// survives; lines are trimmed once the whole content is assembled.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let trim_start = reader.config().trim_text_start;
    let trim_end = reader.config().trim_text_end;
    reader.config_mut().trim_text(false);
    let text = collect_text(reader);
    reader.config_mut().trim_text_start = trim_start;
    reader.config_mut().trim_text_end = trim_end;

    let text = text?;
    let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
    Ok(lines.join("\n"))
}

fn collect_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => text.push_str(&t.decode()?),
            Ok(Event::CData(t)) => text.push_str(&t.decode()?),
            Ok(Event::GeneralRef(r)) => resolve_reference(&r, &mut text)?,
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
    }

    Ok(text)
}

/// Appends the replacement text of `&name;` or `&#n;` to `text`.
fn resolve_reference(reference: &BytesRef<'_>, text: &mut String) -> Result<(), ParseError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        text.push(ch);
        return Ok(());
    }
    let entity = reference.decode()?;
    let replacement =
        resolve_predefined_entity(&entity).ok_or_else(|| ParseError::UnknownEntity {
            entity: entity.to_string(),
        })?;
    text.push_str(replacement);
    Ok(())
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AggregateKind, TypeKind};

    const BOX_IDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<types>
    <builtin name="libxl_string" ctype="char *" destructor="free_str"/>
    <struct name="libxl_box" destructor="libxl_box_destroy" comment="A box.">
        <field name="id" type="int" const="true"/>
        <field name="name" type="libxl_string"/>
        <field name="kind" type="int"/>
        <keyed_union name="payload" keyvar="kind">
            <field name="a" type="int" when="%s == 0"/>
            <field name="b" type="libxl_string" when="%s == 1"/>
        </keyed_union>
    </struct>
</types>"#;

    #[test]
    fn test_parse_box() {
        let model = parse_idl(BOX_IDL).expect("Failed to parse IDL");

        assert_eq!(model.len(), 1);
        let ty = model.get_type("libxl_box").expect("libxl_box");
        assert_eq!(ty.destructor_fn.as_deref(), Some("libxl_box_destroy"));
        assert!(ty.autogenerate_destructor);
        assert_eq!(ty.comment.as_deref(), Some("A box."));
        assert_eq!(ty.passby, PassBy::Reference);

        let TypeKind::Aggregate(agg) = &ty.kind else {
            panic!("expected aggregate");
        };
        assert_eq!(agg.kind, AggregateKind::Struct);
        let names: Vec<_> = agg.fields.iter().map(|f| f.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("id"), Some("name"), Some("kind"), Some("payload")]
        );
        assert!(agg.fields[0].is_const);

        let name_ty = &agg.fields[1].ty;
        assert_eq!(name_ty.typename.as_deref(), Some("char *"));
        assert_eq!(name_ty.destructor_fn.as_deref(), Some("free_str"));
        assert!(!name_ty.autogenerate_destructor);

        let TypeKind::KeyedUnion(ku) = &agg.fields[3].ty.kind else {
            panic!("expected keyed union");
        };
        assert_eq!(ku.keyvar_name, "kind");
        assert_eq!(ku.fields.len(), 2);
        assert_eq!(ku.fields[1].keyvar_expr.as_str(), "%s == 1");
        assert!(agg.fields[3].ty.is_anonymous());
    }

    #[test]
    fn test_builtins_are_not_top_level() {
        let model = parse_idl(BOX_IDL).expect("Failed to parse IDL");
        assert!(!model.has_type("libxl_string"));
    }

    #[test]
    fn test_parse_field_modifiers() {
        let xml = r#"<types>
    <struct name="libxl_inner" destructor="libxl_inner_destroy" autogenerate="false"/>
    <struct name="libxl_outer">
        <field name="flags" type="uint32_t" width="3"/>
        <field name="mac" type="uint8_t" length="6"/>
        <field name="cpus" type="int" length="counted"/>
        <field name="inner" type="libxl_inner" reference="true"/>
        <struct>
            <field name="x" type="int"/>
        </struct>
    </struct>
</types>"#;

        let model = parse_idl(xml).expect("Failed to parse IDL");
        let inner = model.get_type("libxl_inner").expect("libxl_inner");
        assert!(!inner.autogenerate_destructor);

        let outer = model.get_type("libxl_outer").expect("libxl_outer");
        assert!(outer.destructor_fn.is_none());
        let TypeKind::Aggregate(agg) = &outer.kind else {
            panic!("expected aggregate");
        };
        assert!(matches!(agg.fields[0].ty.kind, TypeKind::BitField { width: 3 }));
        assert!(matches!(
            agg.fields[1].ty.kind,
            TypeKind::Array {
                length: ArrayLength::Fixed(6),
                ..
            }
        ));
        assert!(matches!(
            agg.fields[2].ty.kind,
            TypeKind::Array {
                length: ArrayLength::Counted,
                ..
            }
        ));
        assert_eq!(agg.fields[3].ty.typename.as_deref(), Some("libxl_inner *"));
        assert!(agg.fields[4].name.is_none());
        assert!(agg.fields[4].ty.is_struct());
    }

    #[test]
    fn test_parse_comment_element() {
        let xml = r#"<types>
    <struct name="libxl_doc">
        <comment>
            First line.

            Third line.
        </comment>
        <field name="x" type="int"/>
    </struct>
</types>"#;

        let model = parse_idl(xml).expect("Failed to parse IDL");
        let ty = model.get_type("libxl_doc").expect("libxl_doc");
        assert_eq!(ty.comment.as_deref(), Some("First line.\n\nThird line."));
    }

    #[test]
    fn test_unknown_type() {
        let xml = r#"<types>
    <struct name="libxl_bad">
        <field name="x" type="libxl_missing"/>
    </struct>
</types>"#;

        let result = parse_idl(xml);
        assert!(matches!(
            result,
            Err(ParseError::UnknownType { ref type_name, ref owner, ref field })
                if type_name == "libxl_missing" && owner == "struct libxl_bad" && field == "x"
        ));
    }

    #[test]
    fn test_duplicate_type() {
        let xml = r#"<types>
    <struct name="libxl_a"/>
    <struct name="libxl_a"/>
</types>"#;

        assert!(matches!(
            parse_idl(xml),
            Err(ParseError::DuplicateDefinition { .. })
        ));
    }

    #[test]
    fn test_keyed_union_requires_guard() {
        let xml = r#"<types>
    <struct name="libxl_a">
        <field name="kind" type="int"/>
        <keyed_union name="u" keyvar="kind">
            <field name="x" type="int"/>
        </keyed_union>
    </struct>
</types>"#;

        assert!(matches!(
            parse_idl(xml),
            Err(ParseError::MissingAttribute { ref attribute, .. }) if attribute == "when"
        ));
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let xml = r#"<types>
    <struct name="libxl_e" comment="x &amp; y">
        <field name="kind" type="int"/>
        <keyed_union name="u" keyvar="kind">
            <field name="a" type="int" when="(%s &amp; 3) &lt; 2"/>
            <field name="b" type="int" when="%s &gt;= 2"/>
        </keyed_union>
    </struct>
</types>"#;

        let model = parse_idl(xml).expect("Failed to parse IDL");
        let ty = model.get_type("libxl_e").expect("libxl_e");
        assert_eq!(ty.comment.as_deref(), Some("x & y"));

        let TypeKind::Aggregate(agg) = &ty.kind else {
            panic!("expected aggregate");
        };
        let TypeKind::KeyedUnion(ku) = &agg.fields[1].ty.kind else {
            panic!("expected keyed union");
        };
        assert_eq!(ku.fields[0].keyvar_expr.as_str(), "(%s & 3) < 2");
        assert_eq!(ku.fields[1].keyvar_expr.as_str(), "%s >= 2");
    }

    #[test]
    fn test_comment_element_entities_decoded() {
        let xml = r#"<types>
    <struct name="libxl_doc">
        <comment>A &amp; B &lt;tag&gt; &#65;</comment>
        <field name="x" type="int">
            <comment>Width &amp;
                height</comment>
        </field>
    </struct>
</types>"#;

        let model = parse_idl(xml).expect("Failed to parse IDL");
        let ty = model.get_type("libxl_doc").expect("libxl_doc");
        assert_eq!(ty.comment.as_deref(), Some("A & B <tag> A"));

        let TypeKind::Aggregate(agg) = &ty.kind else {
            panic!("expected aggregate");
        };
        assert_eq!(agg.fields[0].comment.as_deref(), Some("Width &\nheight"));
    }

    #[test]
    fn test_unknown_entity() {
        let xml = r#"<types>
    <struct name="libxl_doc">
        <comment>&nbsp;</comment>
    </struct>
</types>"#;

        assert!(matches!(
            parse_idl(xml),
            Err(ParseError::UnknownEntity { ref entity }) if entity == "nbsp"
        ));
    }

    #[test]
    fn test_only_structs_autogenerate_by_default() {
        let xml = r#"<types>
    <builtin name="s" ctype="char *" destructor="free"/>
    <union name="u_t" destructor="u_t_destroy">
        <field name="a" type="s"/>
    </union>
    <struct name="libxl_s" destructor="libxl_s_destroy">
        <field name="a" type="s"/>
    </struct>
</types>"#;

        let model = parse_idl(xml).expect("Failed to parse IDL");
        let union = model.get_type("u_t").expect("u_t");
        assert_eq!(union.destructor_fn.as_deref(), Some("u_t_destroy"));
        assert!(!union.autogenerate_destructor);
        assert!(model.get_type("libxl_s").expect("libxl_s").autogenerate_destructor);
    }

    #[test]
    fn test_missing_types_element() {
        assert!(matches!(
            parse_idl("<?xml version=\"1.0\"?>"),
            Err(ParseError::MalformedElement { .. })
        ));
    }
}
