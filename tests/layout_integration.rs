//! Integration tests for coordinates, constraints and local evaluation

use plot_designer::layout::{
    find_cycle, Attribute, AttributeRef, Constant, Constraint, CoordinateTransform, Element,
    ElementKind, ImageRect, LayoutError, Reference, ScreenRect, Slot, Viewport, VisualBox,
};
use plot_designer::sync::transfer::decode;
use plot_designer::sync::{LayoutRequest, LocalResolver};
use plot_designer::{LayoutPayload, Session};
use pretty_assertions::assert_eq;

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn two_panel_request() -> serde_json::Value {
    serde_json::json!({
        "elements": [
            {"id": "axis-0", "type": "axis", "x": 0.2, "y": 0.3, "width": 1, "height": 1, "text": "left_panel"},
            {"id": "axis-1", "type": "axis", "x": 2.0, "y": 1.795, "width": 0.5, "height": 1, "text": "right_panel"}
        ],
        "constraints": [
            {"target": {"id": "axis-1", "attr": "x"}, "source": {"id": "axis-0", "attr": "right"},
             "multiply": {"id": null, "attr": 1}, "add_before": {"id": null, "attr": 0},
             "add_after": {"id": "spacing", "attr": null}},
            {"target": {"id": "axis-1", "attr": "y"}, "source": {"id": "axis-0", "attr": "top"},
             "multiply": {"id": null, "attr": 1}, "add_before": {"id": null, "attr": 0},
             "add_after": {"id": null, "attr": 0}},
            {"target": {"id": "axis-0", "attr": "x"}, "source": {"id": null, "attr": null},
             "multiply": {"id": null, "attr": 1}, "add_before": {"id": null, "attr": 0.2},
             "add_after": {"id": null, "attr": 0}},
            {"target": {"id": "axis-0", "attr": "y"}, "source": {"id": null, "attr": null},
             "multiply": {"id": null, "attr": 1}, "add_before": {"id": null, "attr": 0},
             "add_after": {"id": "y_offset", "attr": null}}
        ],
        "constants": [
            {"id": "y_offset", "value": 0.3},
            {"id": "spacing", "value": 0.12}
        ],
        "viewport": {"width": 2252, "height": 1000, "scale": 200, "figureWidth": 7, "figureHeight": 5}
    })
}

fn two_panel_payload() -> LayoutPayload {
    serde_json::from_value(two_panel_request()).unwrap()
}

// ============================================================================
// Coordinates
// ============================================================================

#[test]
fn test_screen_image_round_trip_at_several_scales() {
    for scale in [50.0, 100.0, 200.0, 333.0] {
        let viewport = Viewport::new(1600.0, 1000.0).with_scale(scale);
        let t = CoordinateTransform::from_viewport(&viewport).unwrap();

        let image = ImageRect::new(0.75, 1.25, 2.5, 0.5);
        let back = t.to_image(t.to_screen(image));
        assert_close(back.x, image.x);
        assert_close(back.y, image.y);
        assert_close(back.width, image.width);
        assert_close(back.height, image.height);
    }
}

#[test]
fn test_default_viewport_places_unit_box() {
    let t = CoordinateTransform::from_viewport(&Viewport::default()).unwrap();
    let screen = t.to_screen(ImageRect::new(0.0, 0.0, 1.0, 1.0));

    // origin inset by half an inch, top edge one inch above it
    assert_eq!(screen, ScreenRect::new(100.0, 700.0, 200.0, 200.0));
}

#[test]
fn test_visual_box_strips_border() {
    let visual = VisualBox::from_screen(ScreenRect::new(100.0, 700.0, 200.0, 200.0));
    assert_eq!((visual.content_width, visual.content_height), (196.0, 196.0));
    assert_eq!(visual.to_screen(), ScreenRect::new(100.0, 700.0, 200.0, 200.0));
}

#[test]
fn test_zero_scale_rejected() {
    let viewport = Viewport::default().with_scale(0.0);
    assert!(matches!(
        CoordinateTransform::from_viewport(&viewport),
        Err(LayoutError::InvalidScale { .. })
    ));
}

#[test]
fn test_drag_keeps_model_in_image_units() {
    let mut session = Session::from_payload(two_panel_payload());
    let screen = session.screen_rect("axis-0").unwrap();
    let moved = ScreenRect::new(screen.x + 40.0, screen.y - 20.0, screen.width, screen.height);
    session.drag_element("axis-0", moved).unwrap();

    let element = session.element("axis-0").unwrap();
    assert_close(element.x, 0.4);
    assert_close(element.y, 0.4);
    assert_close(element.width, 1.0);
}

// ============================================================================
// Constraint model
// ============================================================================

#[test]
fn test_describe_uses_display_names() {
    let session = Session::from_payload(two_panel_payload());
    let text = session
        .constraint_descriptions()
        .into_iter()
        .chain(session.constant_descriptions())
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(text, @r###"
    right_panel.x ← spacing + left_panel.right
    right_panel.y ← left_panel.top
    left_panel.x ← 0.2
    left_panel.y ← y_offset
    y_offset = 0.3
    spacing = 0.12
    "###);
}

#[test]
fn test_identity_ignores_literal_operands() {
    let target = AttributeRef::new("a", Attribute::Width);
    let a = Constraint::identity(target.clone(), AttributeRef::new("b", Attribute::Width))
        .with_multiply(Reference::literal(2.0));
    let b = Constraint::identity(target.clone(), AttributeRef::new("b", Attribute::Width))
        .with_multiply(Reference::literal(3.0));
    let c = Constraint::identity(target, AttributeRef::new("c", Attribute::Width));

    assert!(a.same_as(&b));
    assert!(!a.same_as(&c));
}

#[test]
fn test_wire_round_trip_keeps_legacy_shape() {
    let payload = two_panel_payload();
    let json = serde_json::to_value(&payload.constraints[2]).unwrap();

    assert_eq!(json["source"], serde_json::json!({"id": null, "attr": null}));
    assert_eq!(json["add_before"], serde_json::json!({"id": null, "attr": 0.2}));
    assert_eq!(json["multiply"], serde_json::json!({"id": null, "attr": 1.0}));
}

#[test]
fn test_cycle_reported_as_chain() {
    let constraints = vec![
        Constraint::identity(AttributeRef::new("a", Attribute::X), AttributeRef::new("b", Attribute::X)),
        Constraint::identity(AttributeRef::new("b", Attribute::X), AttributeRef::new("a", Attribute::Right)),
    ];
    let cycle = find_cycle(&constraints).unwrap();
    assert_eq!(cycle.first(), cycle.last());
    assert!(cycle.iter().any(|v| v == "a.x"));
    assert!(cycle.iter().any(|v| v == "b.x"));
}

// ============================================================================
// Local evaluation
// ============================================================================

#[test]
fn test_two_panel_resync() {
    let request: LayoutRequest = serde_json::from_value(two_panel_request()).unwrap();
    let response = LocalResolver.resolve_now(&request).unwrap();

    let left = &response.elements[0];
    let right = &response.elements[1];
    assert_close(left.x, 0.2);
    assert_close(left.y, 0.3);
    assert_close(right.x, 1.32);
    assert_close(right.y, 1.3);
    assert_eq!(response.constants.len(), 2);
    assert_eq!(response.constraints.len(), 4);
}

#[test]
fn test_add_axis_and_constant_through_wire_request() {
    let mut value = two_panel_request();
    value["action"] = "add".into();
    value["new_type"] = "axis".into();
    let request: LayoutRequest = serde_json::from_value(value).unwrap();
    let response = LocalResolver.resolve_now(&request).unwrap();

    let added = response.elements.iter().find(|e| e.id == "axis-2").unwrap();
    assert_eq!(added.kind, ElementKind::Axis);
    assert_close(added.x, 0.2);
    assert_close(added.y, 0.2);
    assert_eq!((added.width, added.height), (1.0, 1.0));
    assert_eq!(added.text.as_deref(), Some("axis-2"));

    let mut value = two_panel_request();
    value["action"] = "add".into();
    value["new_type"] = "constant".into();
    let request: LayoutRequest = serde_json::from_value(value).unwrap();
    let response = LocalResolver.resolve_now(&request).unwrap();
    assert_eq!(response.constants.last(), Some(&Constant::new("constant0", 0.0)));
}

#[test]
fn test_update_constant_through_wire_request() {
    let mut value = two_panel_request();
    value["action"] = "update_constant".into();
    value["id"] = "y_offset".into();
    value["constant"] = serde_json::json!({"type": "constant", "id": "y_offset", "value": 0.1});
    let request: LayoutRequest = serde_json::from_value(value).unwrap();
    let response = LocalResolver.resolve_now(&request).unwrap();

    assert_close(response.elements[0].y, 0.1);
    assert_close(response.elements[1].y, 1.1);
}

#[test]
fn test_delete_keeps_dangling_constraints() {
    let mut value = two_panel_request();
    value["action"] = "delete".into();
    value["element_id"] = "axis-0".into();
    let request: LayoutRequest = serde_json::from_value(value).unwrap();
    let response = LocalResolver.resolve_now(&request).unwrap();

    assert_eq!(response.elements.len(), 1);
    assert_eq!(response.constraints.len(), 4);
}

const SAVED_DESIGN: &str = "eyJlbGVtZW50cyI6W3siaWQiOiJheGlzLTAiLCJ0eXBlIjoiYXhpcyIsIngiOjAuMjMsInkiOjAuMTUsIndpZHRoIjowLjc2NSwiaGVpZ2h0IjoyLjYyLCJ0ZXh0IjoibGVmdF9wYW5lbCJ9LHsiaWQiOiJheGlzLTEiLCJ0eXBlIjoiYXhpcyIsIngiOjEuMTk1LCJ5IjowLjE1LCJ3aWR0aCI6MC43NjUsImhlaWdodCI6Mi42MiwidGV4dCI6ImNlbnRlcl9sZWZ0In0seyJpZCI6ImF4aXMtMiIsInR5cGUiOiJheGlzIiwieCI6Mi4zMywieSI6MS40OTUsIndpZHRoIjoxLjAyLCJoZWlnaHQiOjEuMjc1LCJ0ZXh0IjoidXBwZXJfbGVmdF9wYW5lbCJ9LHsiaWQiOiJheGlzLTMiLCJ0eXBlIjoiYXhpcyIsIngiOjMuNTUsInkiOjEuNDk1LCJ3aWR0aCI6MS4yNzUsImhlaWdodCI6MS4yNzUsInRleHQiOiJyaWdodCJ9LHsiaWQiOiJheGlzLTQiLCJ0eXBlIjoiYXhpcyIsIngiOjIuMzMsInkiOjAuMTU1LCJ3aWR0aCI6Mi41LCJoZWlnaHQiOjEuMSwidGV4dCI6IndpZGUifV0sImNvbnN0cmFpbnRzIjpbeyJ0YXJnZXQiOnsiaWQiOiJheGlzLTAiLCJhdHRyIjoieCJ9LCJzb3VyY2UiOnsiaWQiOm51bGwsImF0dHIiOm51bGx9LCJtdWx0aXBseSI6eyJpZCI6bnVsbCwiYXR0ciI6MX0sImFkZF9iZWZvcmUiOnsiaWQiOm51bGwsImF0dHIiOjB9LCJhZGRfYWZ0ZXIiOnsiaWQiOiJ4X29mZnNldCIsImF0dHIiOm51bGx9fSx7InRhcmdldCI6eyJpZCI6ImF4aXMtMCIsImF0dHIiOiJ5In0sInNvdXJjZSI6eyJpZCI6bnVsbCwiYXR0ciI6bnVsbH0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6Inlfb2Zmc2V0IiwiYXR0ciI6bnVsbH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy0xIiwiYXR0ciI6InkifSwic291cmNlIjp7ImlkIjoiYXhpcy0wIiwiYXR0ciI6InkifSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjF9LCJhZGRfYmVmb3JlIjp7ImlkIjpudWxsLCJhdHRyIjowfSwiYWRkX2FmdGVyIjp7ImlkIjpudWxsLCJhdHRyIjowfX0seyJ0YXJnZXQiOnsiaWQiOiJheGlzLTEiLCJhdHRyIjoieCJ9LCJzb3VyY2UiOnsiaWQiOiJheGlzLTAiLCJhdHRyIjoicmlnaHQifSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjF9LCJhZGRfYmVmb3JlIjp7ImlkIjpudWxsLCJhdHRyIjowfSwiYWRkX2FmdGVyIjp7ImlkIjoiaF9zcGFjaW5nX3NtYWxsIiwiYXR0ciI6bnVsbH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy00IiwiYXR0ciI6InkifSwic291cmNlIjp7ImlkIjoiYXhpcy0xIiwiYXR0ciI6InkifSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjF9LCJhZGRfYmVmb3JlIjp7ImlkIjpudWxsLCJhdHRyIjowfSwiYWRkX2FmdGVyIjp7ImlkIjpudWxsLCJhdHRyIjowfX0seyJ0YXJnZXQiOnsiaWQiOiJheGlzLTMiLCJhdHRyIjoieCJ9LCJzb3VyY2UiOnsiaWQiOiJheGlzLTIiLCJhdHRyIjoicmlnaHQifSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjF9LCJhZGRfYmVmb3JlIjp7ImlkIjpudWxsLCJhdHRyIjowfSwiYWRkX2FmdGVyIjp7ImlkIjoiaF9zcGFjaW5nX3NtYWxsIiwiYXR0ciI6bnVsbH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy00IiwiYXR0ciI6IngifSwic291cmNlIjp7ImlkIjoiYXhpcy0xIiwiYXR0ciI6InJpZ2h0In0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6Imhfc3BhY2luZ19sYXJnZSIsImF0dHIiOm51bGx9fSx7InRhcmdldCI6eyJpZCI6ImF4aXMtMyIsImF0dHIiOiJ5In0sInNvdXJjZSI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJ5In0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6bnVsbCwiYXR0ciI6MH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy0yIiwiYXR0ciI6InkifSwic291cmNlIjp7ImlkIjoiYXhpcy00IiwiYXR0ciI6InRvcCJ9LCJtdWx0aXBseSI6eyJpZCI6bnVsbCwiYXR0ciI6MX0sImFkZF9iZWZvcmUiOnsiaWQiOm51bGwsImF0dHIiOjB9LCJhZGRfYWZ0ZXIiOnsiaWQiOiJ2X3NwYWNpbmciLCJhdHRyIjpudWxsfX0seyJ0YXJnZXQiOnsiaWQiOiJheGlzLTEiLCJhdHRyIjoid2lkdGgifSwic291cmNlIjp7ImlkIjoiYXhpcy0wIiwiYXR0ciI6IndpZHRoIn0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6bnVsbCwiYXR0ciI6MH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy0wIiwiYXR0ciI6ImhlaWdodCJ9LCJzb3VyY2UiOnsiaWQiOiJheGlzLTEiLCJhdHRyIjoiaGVpZ2h0In0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6bnVsbCwiYXR0ciI6MH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy0zIiwiYXR0ciI6IndpZHRoIn0sInNvdXJjZSI6eyJpZCI6bnVsbCwiYXR0ciI6bnVsbH0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjotMX0sImFkZF9iZWZvcmUiOnsiaWQiOiJheGlzLTMiLCJhdHRyIjoieCJ9LCJhZGRfYWZ0ZXIiOnsiaWQiOiJheGlzLTQiLCJhdHRyIjoicmlnaHQifX0seyJ0YXJnZXQiOnsiaWQiOiJheGlzLTQiLCJhdHRyIjoid2lkdGgifSwic291cmNlIjp7ImlkIjpudWxsLCJhdHRyIjpudWxsfSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjF9LCJhZGRfYmVmb3JlIjp7ImlkIjpudWxsLCJhdHRyIjoyLjV9LCJhZGRfYWZ0ZXIiOnsiaWQiOm51bGwsImF0dHIiOjB9fSx7InRhcmdldCI6eyJpZCI6ImF4aXMtNCIsImF0dHIiOiJoZWlnaHQifSwic291cmNlIjp7ImlkIjoiYXhpcy0xIiwiYXR0ciI6ImhlaWdodCJ9LCJtdWx0aXBseSI6eyJpZCI6bnVsbCwiYXR0ciI6MC40Mn0sImFkZF9iZWZvcmUiOnsiaWQiOm51bGwsImF0dHIiOjB9LCJhZGRfYWZ0ZXIiOnsiaWQiOm51bGwsImF0dHIiOjB9fSx7InRhcmdldCI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJ4In0sInNvdXJjZSI6eyJpZCI6ImF4aXMtNCIsImF0dHIiOiJ4In0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6bnVsbCwiYXR0ciI6MH0sImFkZF9hZnRlciI6eyJpZCI6bnVsbCwiYXR0ciI6MH19LHsidGFyZ2V0Ijp7ImlkIjoiYXhpcy0yIiwiYXR0ciI6IndpZHRoIn0sInNvdXJjZSI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJoZWlnaHQifSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOjAuOH0sImFkZF9iZWZvcmUiOnsiaWQiOm51bGwsImF0dHIiOjB9LCJhZGRfYWZ0ZXIiOnsiaWQiOm51bGwsImF0dHIiOjB9fSx7InRhcmdldCI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJoZWlnaHQifSwic291cmNlIjp7ImlkIjpudWxsLCJhdHRyIjpudWxsfSwibXVsdGlwbHkiOnsiaWQiOm51bGwsImF0dHIiOi0xfSwiYWRkX2JlZm9yZSI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJ5In0sImFkZF9hZnRlciI6eyJpZCI6ImF4aXMtMSIsImF0dHIiOiJ0b3AifX0seyJ0YXJnZXQiOnsiaWQiOiJheGlzLTMiLCJhdHRyIjoiaGVpZ2h0In0sInNvdXJjZSI6eyJpZCI6bnVsbCwiYXR0ciI6bnVsbH0sIm11bHRpcGx5Ijp7ImlkIjpudWxsLCJhdHRyIjoxfSwiYWRkX2JlZm9yZSI6eyJpZCI6ImF4aXMtMiIsImF0dHIiOiJoZWlnaHQifSwiYWRkX2FmdGVyIjp7ImlkIjpudWxsLCJhdHRyIjowfX1dLCJjb25zdGFudHMiOlt7ImlkIjoieV9vZmZzZXQiLCJ2YWx1ZSI6MC4xNX0seyJpZCI6Imhfc3BhY2luZ19zbWFsbCIsInZhbHVlIjowLjJ9LHsiaWQiOiJoX3NwYWNpbmdfbGFyZ2UiLCJ2YWx1ZSI6MC4zN30seyJpZCI6InZfc3BhY2luZyIsInZhbHVlIjowLjI0fSx7ImlkIjoieF9vZmZzZXQiLCJ2YWx1ZSI6MC4yM31dLCJ2aWV3cG9ydCI6eyJ3aWR0aCI6MjI1MiwiaGVpZ2h0IjoxMDAwLCJzY2FsZSI6MjAwLCJmaWd1cmVXaWR0aCI6NiwiZmlndXJlSGVpZ2h0Ijo0fX0=";

fn element<'a>(elements: &'a [Element], id: &str) -> &'a Element {
    elements.iter().find(|e| e.id == id).unwrap()
}

fn constraint_on<'a>(constraints: &'a mut [Constraint], id: &str, attr: Attribute) -> &'a mut Constraint {
    constraints
        .iter_mut()
        .find(|c| c.target == AttributeRef::new(id, attr))
        .unwrap()
}

#[test]
fn test_saved_design_loads_unchanged() {
    let payload = decode(SAVED_DESIGN).unwrap();

    assert_eq!(payload.viewport.figure_width, 6.0);
    assert_eq!(payload.viewport.figure_height, 4.0);
    assert_eq!(payload.elements.len(), 5);
    assert_eq!(payload.constants.len(), 5);
    assert_eq!(payload.constraints.len(), 18);

    let expected = [
        ("axis-0", 0.23, 0.15, 0.765, 2.62, "left_panel"),
        ("axis-1", 1.195, 0.15, 0.765, 2.62, "center_left"),
        ("axis-2", 2.33, 1.495, 1.02, 1.275, "upper_left_panel"),
        ("axis-3", 3.55, 1.495, 1.275, 1.275, "right"),
        ("axis-4", 2.33, 0.155, 2.5, 1.1, "wide"),
    ];
    for (id, x, y, width, height, text) in expected {
        let e = element(&payload.elements, id);
        assert_close(e.x, x);
        assert_close(e.y, y);
        assert_close(e.width, width);
        assert_close(e.height, height);
        assert_eq!(e.text.as_deref(), Some(text));
    }
}

#[test]
fn test_saved_design_resolves_after_edits() {
    let mut payload = decode(SAVED_DESIGN).unwrap();

    payload
        .constants
        .iter_mut()
        .find(|c| c.id == "x_offset")
        .unwrap()
        .value = 0.5;
    payload
        .elements
        .iter_mut()
        .find(|e| e.id == "axis-0")
        .unwrap()
        .width = 0.25;
    constraint_on(&mut payload.constraints, "axis-4", Attribute::Height)
        .set_slot(Slot::Multiply, Reference::literal(0.24));
    let axis_2_x = constraint_on(&mut payload.constraints, "axis-2", Attribute::X);
    axis_2_x.set_slot(Slot::AddAfter, Reference::constant("h_spacing_small"));
    axis_2_x.set_slot(Slot::Source, Reference::attribute("axis-1", Attribute::Right));

    let response = LocalResolver.resolve_now(&LayoutRequest::resync(payload)).unwrap();

    let expected = [
        ("axis-0", 0.5, 0.15, 0.25, 2.62),
        ("axis-1", 0.95, 0.15, 0.25, 2.62),
        ("axis-2", 1.4, 1.0188, 1.40096, 1.7512),
        ("axis-3", 3.00096, 1.0188, 1.06904, 1.7512),
        ("axis-4", 1.57, 0.15, 2.5, 0.6288),
    ];
    for (id, x, y, width, height) in expected {
        let e = element(&response.elements, id);
        assert_close(e.x, x);
        assert_close(e.y, y);
        assert_close(e.width, width);
        assert_close(e.height, height);
    }
    assert_eq!(element(&response.elements, "axis-2").text.as_deref(), Some("upper_left_panel"));
}

#[test]
fn test_resolving_resolved_design_is_stable() {
    let payload = decode(SAVED_DESIGN).unwrap();
    let first = LocalResolver.resolve_now(&LayoutRequest::resync(payload.clone())).unwrap();

    let again = LayoutPayload {
        elements: first.elements.clone(),
        ..payload
    };
    let second = LocalResolver.resolve_now(&LayoutRequest::resync(again)).unwrap();
    assert_eq!(first, second);
}
