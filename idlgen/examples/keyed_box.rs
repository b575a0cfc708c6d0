//! Builds a type model in code and prints the generated C sources.
//!
//! Run with: `cargo run --example keyed_box`

use idlgen::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let int = Arc::new(Type::builtin("int"));
    let string = Arc::new(Type::builtin("char *").with_destructor("free"));

    let payload = Arc::new(Type::keyed_union(
        None,
        "kind",
        vec![
            KeyedField::new(Field::new("a", int.clone()), "%s == 0"),
            KeyedField::new(Field::new("b", string.clone()), "%s == 1"),
        ],
    ));

    let boxed = Type::structure(
        Some("demo_box".to_string()),
        vec![
            Field::new("id", int.clone()).constant(),
            Field::new("name", string),
            Field::new("kind", int).with_comment("Selects the active payload member."),
            Field::new("payload", payload),
        ],
    )
    .with_comment("A named box holding one of two payloads.")
    .with_destructor("demo_box_destroy")
    .autogenerate(true);

    let mut model = TypeModel::new();
    model.add_type(Arc::new(boxed));

    let sources = Generator::new(&model)
        .with_config(GeneratorConfig::new().header_guard("__DEMO_BOX_H"))
        .generate()?;

    println!("{}", sources.header);
    println!("{}", sources.implementation);

    Ok(())
}
