//! Command line front end: `idlgen <idl> <header> <implementation>`.

use anyhow::Context;
use clap::Parser;
use idlgen::{Generator, GeneratorConfig, parse_idl_file};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate C type declarations and destructors from an XML IDL.
#[derive(Debug, Parser)]
#[command(name = "idlgen", version, about)]
struct Cli {
    /// XML IDL describing the types.
    idl: PathBuf,
    /// Header file receiving the declarations.
    header: PathBuf,
    /// Implementation file receiving the destructors.
    implementation: PathBuf,
    /// Include guard macro; derived from the header file name when omitted.
    #[arg(long)]
    guard: Option<String>,
    /// Extra header included by the implementation file (repeatable).
    #[arg(long = "include")]
    includes: Vec<String>,
    /// Byte written over destroyed instances.
    #[arg(long, value_parser = parse_byte)]
    poison_byte: Option<u8>,
    /// Name of the poison macro.
    #[arg(long)]
    poison_macro: Option<String>,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid byte '{}': {}", value, e))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let model = parse_idl_file(&cli.idl)
        .with_context(|| format!("failed to load IDL {}", cli.idl.display()))?;
    tracing::debug!(types = model.len(), "loaded type model");

    let sources = Generator::new(&model)
        .with_config(config)
        .generate()
        .with_context(|| format!("failed to generate sources from {}", cli.idl.display()))?;
    sources
        .write(&cli.header, &cli.implementation)
        .context("failed to write generated sources")?;

    Ok(())
}

fn build_config(cli: &Cli) -> GeneratorConfig {
    let header_name = cli
        .header
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "types.h".to_string());

    let guard = cli
        .guard
        .clone()
        .unwrap_or_else(|| GeneratorConfig::guard_for(&header_name));

    let provenance = std::iter::once("idlgen".to_string())
        .chain(
            [&cli.idl, &cli.header, &cli.implementation]
                .iter()
                .map(|path| path.display().to_string()),
        )
        .collect::<Vec<_>>()
        .join(" ");

    let mut config = GeneratorConfig::new()
        .header_guard(guard)
        .provenance(provenance)
        .include(header_name);
    for include in &cli.includes {
        config = config.include(include.clone());
    }
    if let Some(byte) = cli.poison_byte {
        config = config.poison_byte(byte);
    }
    if let Some(name) = &cli.poison_macro {
        config = config.poison_macro(name.clone());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("0xa5"), Ok(0xa5));
        assert_eq!(parse_byte("165"), Ok(165));
        assert!(parse_byte("0x1ff").is_err());
    }

    #[test]
    fn test_build_config() {
        let cli = Cli::parse_from([
            "idlgen",
            "types.xml",
            "out/libxl_types.h",
            "out/libxl_types.c",
            "--include",
            "libxl_osdeps.h",
            "--poison-byte",
            "0x5a",
        ]);
        let config = build_config(&cli);

        assert_eq!(config.header_guard, "__LIBXL_TYPES_H");
        assert_eq!(config.includes, vec!["\"libxl_types.h\"", "\"libxl_osdeps.h\""]);
        assert_eq!(config.poison_byte, 0x5a);
        assert_eq!(
            config.provenance.as_deref(),
            Some("idlgen types.xml out/libxl_types.h out/libxl_types.c")
        );
    }
}
