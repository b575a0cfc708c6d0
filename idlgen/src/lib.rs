//! # idlgen
//!
//! C type declaration and destructor generator.
//!
//! Given a type model of C-like structures (structs, unions, keyed unions,
//! bitfields, references and arrays), idlgen emits a header with the type
//! declarations and an implementation file with recursive destructors that
//! release every owned resource of an instance.
//!
//! ## Quick Start
//!
//! ```ignore
//! use idlgen::prelude::*;
//!
//! let model = parse_idl(&std::fs::read_to_string("types.xml")?)?;
//! let sources = Generator::new(&model)
//!     .with_config(GeneratorConfig::new().include("libxl.h"))
//!     .generate()?;
//! sources.write("types.h".as_ref(), "types.c".as_ref())?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Type model and XML IDL loader
//! - [`codegen`] - Declaration, destructor and file generation

pub mod prelude;

/// Type model and IDL loading.
pub mod model {
    pub use idlgen_model::*;
}

/// C code generation.
pub mod codegen {
    pub use idlgen_codegen::*;
}

pub use idlgen_codegen::{
    CodegenError, GeneratedSources, Generator, GeneratorConfig, generate_from_file,
    generate_from_xml, write_sources,
};
pub use idlgen_model::{ParseError, TypeModel, parse_idl, parse_idl_file};
