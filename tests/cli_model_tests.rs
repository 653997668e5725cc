//! The demo model shipped with the CLI loads and derives.

use buildsmith::cli::commands::{load_model, render_families};
use buildsmith::derive::{DerivationConfig, Deriver};

const SHAPES: &str = include_str!("../demos/shapes.json");

#[test]
fn demo_model_derives_every_family() {
    let mut repo = load_model(SHAPES).expect("demo model loads");
    let families = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_buildables()
        .expect("demo model derives");

    let sources: Vec<&str> = families.iter().map(|f| f.source.simple_name()).collect();
    assert_eq!(sources, vec!["Point", "Shape", "Circle", "Square", "Drawing"]);
}

#[test]
fn demo_outline_shows_typed_entry_points() {
    let mut repo = load_model(SHAPES).expect("demo model loads");
    let families = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_buildables()
        .expect("demo model derives");

    let drawing = render_families(&families, Some("demo.shapes.Drawing"));
    assert!(drawing.starts_with("// demo.shapes.Drawing\n"));
    for line in [
        "  CircleShapesNested<S> addNewCircleShape()",
        "  S addNewSquareShape(double)",
        "  interface SquareShapesNested<N> extends Nested<N>, SquareFluent<SquareShapesNested<N>>",
    ] {
        assert!(drawing.contains(line), "missing `{line}` in\n{drawing}");
    }

    let shape = render_families(&families, Some("Shape"));
    assert!(shape.contains(
        "abstract class ShapeBuilder extends ShapeFluentImpl<ShapeBuilder> implements VisitableBuilder<Shape, ShapeBuilder>"
    ));
}
