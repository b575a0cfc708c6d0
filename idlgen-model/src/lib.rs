//! # idlgen Model
//!
//! Type model and IDL loader for the C type generator.
//!
//! This crate provides:
//! - The immutable type tree consumed by the generators
//! - Keyed union discriminant templates
//! - An XML IDL loader producing the type tree

pub mod error;
pub mod parser;
pub mod types;

pub use error::ParseError;
pub use parser::{parse_idl, parse_idl_file};
pub use types::{
    Aggregate, AggregateKind, ArrayLength, Field, KeyedField, KeyedUnion, KeyvarTemplate, PassBy,
    Type, TypeKind, TypeModel,
};
