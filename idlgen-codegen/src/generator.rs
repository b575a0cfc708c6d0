//! Header and implementation file generation.

use crate::c::{DeclarationGenerator, DestructorGenerator};
use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use idlgen_model::TypeModel;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Standard headers every implementation file includes.
const STANDARD_INCLUDES: &[&str] = &["<stdint.h>", "<stdlib.h>", "<string.h>"];

/// The two generated output streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Type declarations and destructor prototypes.
    pub header: String,
    /// Autogenerated destructor definitions.
    pub implementation: String,
}

impl GeneratedSources {
    /// Writes both streams to disk.
    ///
    /// Each stream is staged in a temporary file next to its target and
    /// renamed into place only once both are staged. If the second rename
    /// fails the header is removed again.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if either file cannot be written.
    pub fn write(&self, header_path: &Path, implementation_path: &Path) -> Result<(), CodegenError> {
        let header = stage(header_path, &self.header)?;
        let implementation = stage(implementation_path, &self.implementation)?;

        tracing::info!("outputting type definitions to {}", header_path.display());
        header.persist(header_path).map_err(|e| e.error)?;

        tracing::info!(
            "outputting type implementations to {}",
            implementation_path.display()
        );
        if let Err(e) = implementation.persist(implementation_path) {
            if let Err(cleanup) = std::fs::remove_file(header_path) {
                tracing::warn!("failed to remove {}: {}", header_path.display(), cleanup);
            }
            return Err(e.error.into());
        }
        Ok(())
    }
}

/// Writes `contents` to a temporary file in the directory of `path`.
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, CodegenError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".idlgen-")
        .tempfile_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Main code generator.
pub struct Generator<'a> {
    model: &'a TypeModel,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with default configuration.
    #[must_use]
    pub fn new(model: &'a TypeModel) -> Self {
        Self {
            model,
            config: GeneratorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates both output streams.
    ///
    /// # Errors
    /// Returns the first `CodegenError` raised by any type; no partial output
    /// is returned.
    pub fn generate(&self) -> Result<GeneratedSources, CodegenError> {
        Ok(GeneratedSources {
            header: self.generate_header()?,
            implementation: self.generate_implementation()?,
        })
    }

    /// Generates the declarations stream.
    ///
    /// # Errors
    /// Returns `CodegenError` if a type cannot be declared.
    pub fn generate_header(&self) -> Result<String, CodegenError> {
        let guard = &self.config.header_guard;
        let mut output = String::new();

        output.push_str(&format!("#ifndef {}\n", guard));
        output.push_str(&format!("#define {}\n\n", guard));
        output.push_str(&self.banner());
        output.push('\n');

        for ty in &self.model.types {
            tracing::debug!(type_name = ty.display_name(), "declaring type");
            output.push_str(&DeclarationGenerator::new(ty).generate()?);
            output.push('\n');
        }

        output.push_str(&format!("#endif /* {} */\n", guard));

        Ok(output)
    }

    /// Generates the destructor implementation stream.
    ///
    /// # Errors
    /// Returns `CodegenError` if a destructor cannot be synthesized.
    pub fn generate_implementation(&self) -> Result<String, CodegenError> {
        let mut output = String::new();

        output.push_str(&self.banner());
        output.push('\n');

        for include in STANDARD_INCLUDES
            .iter()
            .copied()
            .chain(self.config.includes.iter().map(String::as_str))
        {
            output.push_str(&format!("#include {}\n", include));
        }
        output.push('\n');

        output.push_str(&format!(
            "#define {} {:#04x}\n\n",
            self.config.poison_macro, self.config.poison_byte
        ));

        for ty in self
            .model
            .types
            .iter()
            .filter(|ty| ty.has_generated_destructor())
        {
            tracing::debug!(type_name = ty.display_name(), "synthesizing destructor");
            output.push_str(&DestructorGenerator::new(ty, &self.config).generate()?);
            output.push('\n');
        }

        Ok(output)
    }

    fn banner(&self) -> String {
        let mut output = String::new();
        output.push_str("/*\n");
        output.push_str(" * DO NOT EDIT.\n");
        output.push_str(" *\n");
        match &self.config.provenance {
            Some(provenance) => {
                output.push_str(" * This file is autogenerated by\n");
                output.push_str(&format!(" * \"{}\"\n", provenance));
            }
            None => output.push_str(" * This file is autogenerated by idlgen.\n"),
        }
        output.push_str(" */\n");
        output
    }
}
