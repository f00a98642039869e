//! Builds a three-generation family tree, counts its persons and prints it.
//!
//! ```text
//! cargo run -p gentry_render --example family -- [html|mermaid|json] [--verbose]
//! ```

use std::env;

use gentry_render::{
    HtmlLayout, JsonRenderer, KindAppearance, Mermaid, RenderConfig, RenderError, Renderer, Shape,
    Style,
};
use gentry_tree::{Count, Node, NodeKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RenderError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let format = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(String::as_str)
        .unwrap_or("mermaid");

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let family = NodeKind::builder("Family").build()?;
    let person = NodeKind::define("Person", ["children"])?;
    let grandmother = NodeKind::builder("GrandMother").extends(&person).build()?;
    let mother = NodeKind::builder("Mother")
        .extends(&person)
        .groups(["girls", "boys"])
        .build()?;
    let child = NodeKind::builder("Child").extends(&person).build()?;

    let c = |label: &str| Node::of(&child, label);

    let mut anna = Node::of(&mother, "Anna");
    anna.set_group(
        "girls",
        vec![
            c("Alice"),
            c("Cherryl").with_properties([("chess master", "ELO 2235")]),
        ],
    )?;
    anna.set_group("boys", vec![c("Bob"), c("Dick")])?;

    // Declared groups start out empty and can be appended to in place.
    let mut beatrice = Node::of(&mother, "Beatrice");
    beatrice.get_group("girls")?.push(c("Ellen"));
    beatrice.get_group("girls")?.push(
        c("Gladys").with_properties([("drivers license", 2023), ("nose piercing", 2024)]),
    );
    beatrice.set_group("boys", vec![c("Fergal"), c("Hank")])?;

    let mut granny = Node::of(&grandmother, "Granny");
    granny.set_group("children", vec![anna, beatrice])?;

    // Family declares no groups, so its children go straight into the map.
    let andersons = Node::of(&family, "The Andersons").with_group("matriarch", vec![granny]);

    let family_count = Count::visitor()
        .derive("FamilyCount")
        .specific_in(Count::CLASS, "Family", |_: &Node| 0);
    let persons = Count::with_visitor(family_count).count(&andersons)?;
    info!(persons, "Counted persons in {}", andersons.label);

    let config = RenderConfig::new()
        .with_kind(
            "GrandMother",
            KindAppearance {
                shape: Some(Shape::Braces),
                style: Some(Style::Function),
                include_properties: None,
            },
        )
        .with_kind(
            "Child",
            KindAppearance {
                include_properties: Some(true),
                ..Default::default()
            },
        );

    let output = match format {
        "html" => HtmlLayout::with_config(config).render(&andersons)?,
        "json" => JsonRenderer::new().pretty(true).render(&andersons)?,
        "mermaid" => Mermaid::with_config(config).render(&andersons)?,
        other => {
            return Err(RenderError::config(format!(
                "Unknown format '{other}', expected html, mermaid or json"
            )));
        }
    };
    println!("{output}");

    Ok(())
}
