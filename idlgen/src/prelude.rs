//! Prelude module for convenient imports.
//!
//! ```ignore
//! use idlgen::prelude::*;
//! ```

// Model types
pub use idlgen_model::{
    AggregateKind, ArrayLength, Field, KeyedField, KeyvarTemplate, ParseError, PassBy, Type,
    TypeKind, TypeModel, parse_idl, parse_idl_file,
};

// Generation
pub use idlgen_codegen::c::{DeclarationGenerator, DestructorGenerator, Stmt};
pub use idlgen_codegen::{CodegenError, GeneratedSources, Generator, GeneratorConfig};
