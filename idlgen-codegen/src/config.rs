//! Generator configuration.

/// Default poison byte written over destroyed instances.
pub const DEFAULT_POISON_BYTE: u8 = 0xa5;

/// Settings for the generated header and implementation files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Include guard macro of the header.
    pub header_guard: String,
    /// Extra `#include` targets for the implementation, e.g. `"libxl.h"` or `<stdio.h>`.
    pub includes: Vec<String>,
    /// Name of the poison macro.
    pub poison_macro: String,
    /// Byte written over destroyed instances.
    pub poison_byte: u8,
    /// Provenance printed in the DO NOT EDIT banner.
    pub provenance: Option<String>,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            header_guard: "IDLGEN_TYPES_H".to_string(),
            includes: Vec::new(),
            poison_macro: "IDLGEN_DTOR_POISON".to_string(),
            poison_byte: DEFAULT_POISON_BYTE,
            provenance: None,
        }
    }

    /// Sets the header include guard.
    #[must_use]
    pub fn header_guard(mut self, guard: impl Into<String>) -> Self {
        self.header_guard = guard.into();
        self
    }

    /// Adds an include to the implementation file.
    ///
    /// Bare names are quoted; `<...>` and `"..."` are kept as given.
    #[must_use]
    pub fn include(mut self, include: impl Into<String>) -> Self {
        let include = include.into();
        if include.starts_with('<') || include.starts_with('"') {
            self.includes.push(include);
        } else {
            self.includes.push(format!("\"{}\"", include));
        }
        self
    }

    /// Sets the poison macro name.
    #[must_use]
    pub fn poison_macro(mut self, name: impl Into<String>) -> Self {
        self.poison_macro = name.into();
        self
    }

    /// Sets the poison byte.
    #[must_use]
    pub fn poison_byte(mut self, byte: u8) -> Self {
        self.poison_byte = byte;
        self
    }

    /// Sets the provenance line of the banner.
    #[must_use]
    pub fn provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// Derives an include guard from a header file name, e.g. `libxl_types.h`
    /// becomes `__LIBXL_TYPES_H`.
    #[must_use]
    pub fn guard_for(file_name: &str) -> String {
        let sanitized: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("__{}", sanitized)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
