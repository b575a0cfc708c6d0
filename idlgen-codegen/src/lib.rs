//! # idlgen Codegen
//!
//! C code generation from type models.
//!
//! This crate provides:
//! - Type declaration generation (structs, unions, keyed unions, bitfields)
//! - Recursive destructor synthesis
//! - Header and implementation file generation

pub mod c;
pub mod config;
pub mod error;
pub mod generator;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{GeneratedSources, Generator};

use std::path::Path;

/// Generates C sources from an XML IDL string.
///
/// # Arguments
/// * `xml` - XML IDL content
/// * `config` - Output settings
///
/// # Returns
/// The generated header and implementation.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    config: GeneratorConfig,
) -> Result<GeneratedSources, CodegenError> {
    let model = idlgen_model::parse_idl(xml)?;
    Generator::new(&model).with_config(config).generate()
}

/// Generates C sources from an XML IDL file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &Path,
    config: GeneratorConfig,
) -> Result<GeneratedSources, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, config)
}

/// Generates C sources from an XML IDL file and writes them to disk.
///
/// Nothing is written unless both streams were generated successfully.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, generation or writing fails.
pub fn write_sources(
    idl_path: &Path,
    header_path: &Path,
    implementation_path: &Path,
    config: GeneratorConfig,
) -> Result<(), CodegenError> {
    let sources = generate_from_file(idl_path, config)?;
    sources.write(header_path, implementation_path)
}
