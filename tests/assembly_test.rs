//! End-to-end assembly tests.
//!
//! Every document is decoded with serde_json so assertions read the option
//! tree instead of matching on raw text.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chart_assembly::components::AxisPart;
use chart_assembly::encoder::{assign_serials, encode_categories, DatasetPlan, EncodeContext, SerialArena};
use chart_assembly::prelude::*;
use chart_assembly::registry::PartRegistry;
use serde_json::{json, Value};

fn decode(json: &str) -> Value {
    serde_json::from_str(json).expect("assembled document must be valid JSON")
}

fn grid() -> Arc<CoordinateSystem> {
    Arc::new(
        CoordinateSystem::rectangular()
            .axis(Arc::new(Axis::x(DataType::Number)))
            .axis(Arc::new(Axis::y(DataType::Number))),
    )
}

fn numbers(len: usize) -> Arc<NumberData> {
    Arc::new(NumberData::new((0..len).map(|i| i as f64)))
}

fn line_on(cs: &Arc<CoordinateSystem>, len: usize) -> Chart {
    Chart::line()
        .plot_on(Arc::clone(cs))
        .data(numbers(len))
        .data(numbers(len))
}

// ============================================================================
// Property dictionary
// ============================================================================

#[test]
fn test_dictionary_drops_absent_and_empty_entries() {
    let mut props = Properties::new();
    props
        .set("show", true)
        .set("name", None::<&str>)
        .set("extra", Properties::new());
    assert_eq!(props.encode().unwrap(), r#""show":true"#);
}

// ============================================================================
// Serials and ordering
// ============================================================================

#[test]
fn test_sections_follow_category_order() {
    let cs = grid();
    let mut document = ChartDocument::new();
    document
        .set_title(Some(Title::new("Sales")))
        .set_tooltip(Some(Tooltip::new().trigger(TooltipTrigger::Axis)))
        .add(Arc::new(line_on(&cs, 3)));

    let value = decode(&document.assemble().unwrap());
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        ["title", "legend", "tooltip", "dataset", "xAxis", "yAxis", "grid", "series"]
    );
}

#[test]
fn test_charts_on_separate_grids_reference_their_axes() {
    let first = grid();
    let second = grid();
    let mut document = ChartDocument::new();
    document
        .add(Arc::new(line_on(&first, 2).named("a")))
        .add(Arc::new(line_on(&second, 2).named("b")));

    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["grid"].as_array().unwrap().len(), 2);
    assert_eq!(value["xAxis"][1]["gridIndex"], 1);
    assert!(value["xAxis"][0].get("gridIndex").is_none());
    assert!(value["series"][0].get("xAxisIndex").is_none());
    assert_eq!(value["series"][1]["xAxisIndex"], 1);
    assert_eq!(value["series"][1]["yAxisIndex"], 1);
}

#[test]
fn test_value_equal_axes_share_one_entry() {
    let cs = grid();
    let x = cs.axes()[0].clone();
    let a: Arc<dyn Part> = Arc::new(AxisPart::new(Arc::clone(&x), cs.id(), "gridIndex"));
    let b: Arc<dyn Part> = Arc::new(AxisPart::new(x, cs.id(), "gridIndex"));

    let mut registry = PartRegistry::new(false);
    registry.add(Arc::clone(&a));
    registry.add(Arc::clone(&b));
    assert_eq!(registry.len(), 2);

    let parts: Vec<Arc<dyn Part>> = registry.parts().cloned().collect();
    let mut arena = SerialArena::new();
    let ordered = assign_serials(&parts, &mut arena);
    let plan = DatasetPlan::default();
    let ctx = EncodeContext::new(&arena, &plan, false, false);
    assert_eq!(ctx.serial_of(a.as_ref()), ctx.serial_of(b.as_ref()));

    let mut document = Properties::new();
    encode_categories(&ordered, &ctx, &mut document).unwrap();
    assert_eq!(document.encode().unwrap(), r#""xAxis":[{"type":"value"}]"#);
}

#[test]
fn test_default_series_names_follow_serials() {
    let cs = grid();
    let mut document = ChartDocument::new();
    document
        .add(Arc::new(line_on(&cs, 2)))
        .add(Arc::new(line_on(&cs, 2)));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["series"][0]["name"], "Chart 1");
    assert_eq!(value["series"][1]["name"], "Chart 2");
}

// ============================================================================
// Dataset grouping
// ============================================================================

#[test]
fn test_providers_group_by_element_count() {
    let cs = grid();
    let shared = numbers(3);
    let scatter = Chart::scatter()
        .plot_on(Arc::clone(&cs))
        .data(shared.clone())
        .data(shared);
    let mut document = ChartDocument::new();
    document.add(Arc::new(line_on(&cs, 4))).add(Arc::new(scatter));

    let value = decode(&document.assemble().unwrap());
    assert_eq!(
        value["dataset"],
        json!([
            {"source": {"d0": [0, 1, 2, 3], "d1": [0, 1, 2, 3]}},
            {"source": {"d2": [0, 1, 2]}}
        ])
    );
    assert!(value["series"][0].get("datasetIndex").is_none());
    assert_eq!(value["series"][0]["encode"], json!({"x": "d0", "y": "d1"}));
    assert_eq!(value["series"][1]["datasetIndex"], 1);
    assert_eq!(value["series"][1]["encode"], json!({"x": "d2", "y": "d2"}));
}

#[test]
fn test_providers_group_by_chart() {
    let cs = grid();
    let config = AssemblyConfig::new().with_dataset_grouping(DatasetGrouping::ByChart);
    let mut by_chart = ChartDocument::with_config(config);
    let mut by_count = ChartDocument::new();
    for document in [&mut by_chart, &mut by_count] {
        document
            .add(Arc::new(line_on(&cs, 3)))
            .add(Arc::new(line_on(&cs, 3)));
    }

    let grouped = decode(&by_chart.assemble().unwrap());
    assert_eq!(grouped["dataset"].as_array().unwrap().len(), 2);
    assert_eq!(grouped["series"][1]["datasetIndex"], 1);

    let merged = decode(&by_count.assemble().unwrap());
    assert_eq!(merged["dataset"]["source"].as_object().unwrap().len(), 4);
}

#[test]
fn test_opt_out_provider_forces_inline_data() {
    let cs = grid();
    let custom = NumberData::new([5.0, 6.0]).with_encoder(|v, _| format!("{{\"value\":{v}}}"));
    let chart = Chart::line()
        .plot_on(Arc::clone(&cs))
        .data(numbers(2))
        .data(Arc::new(custom));
    let mut document = ChartDocument::new();
    document.add(Arc::new(chart)).add(Arc::new(line_on(&cs, 2)));

    let value = decode(&document.assemble().unwrap());
    assert!(value.get("dataset").is_none());
    assert_eq!(value["series"][0]["data"], json!([[0, {"value": 5}], [1, {"value": 6}]]));
    assert_eq!(value["series"][1]["data"], json!([[0, 0], [1, 1]]));
    assert!(value["series"][1].get("encode").is_none());
}

#[test]
fn test_charts_sharing_labels_group_by_chart() {
    let cs = Arc::new(
        CoordinateSystem::rectangular()
            .axis(Arc::new(Axis::x(DataType::Category)))
            .axis(Arc::new(Axis::y(DataType::Number))),
    );
    let days = Arc::new(CategoryData::labels(["Mon", "Tue", "Wed"]));
    let visits = Chart::bar()
        .plot_on(Arc::clone(&cs))
        .data(days.clone())
        .data(Arc::new(NumberData::new([1.0, 2.0, 3.0])));
    let orders = Chart::line()
        .plot_on(Arc::clone(&cs))
        .data(days)
        .data(Arc::new(NumberData::new([4.0, 5.0, 6.0])));
    let config = AssemblyConfig::new().with_dataset_grouping(DatasetGrouping::ByChart);
    let mut document = ChartDocument::with_config(config);
    document.add(Arc::new(visits)).add(Arc::new(orders));

    let full = decode(&document.assemble().unwrap());
    assert_eq!(
        full["dataset"],
        json!([
            {"source": {"d0": ["Mon", "Tue", "Wed"], "d1": [1, 2, 3]}},
            {"source": {"d0": ["Mon", "Tue", "Wed"], "d2": [4, 5, 6]}}
        ])
    );
    assert!(full["series"][0].get("datasetIndex").is_none());
    assert_eq!(full["series"][0]["encode"], json!({"x": "d0", "y": "d1"}));
    assert_eq!(full["series"][1]["datasetIndex"], 1);
    assert_eq!(full["series"][1]["encode"], json!({"x": "d0", "y": "d2"}));

    let partial = decode(&document.assemble_with(true).unwrap());
    assert!(partial.get("dataset").is_none());
    assert_eq!(partial["series"], full["series"]);
}

#[test]
fn test_unequal_lengths_fall_back_to_inline_data() {
    let cs = grid();
    let chart = Chart::line()
        .plot_on(Arc::clone(&cs))
        .data(Arc::new(CategoryData::labels(["a", "b", "c", "d"])))
        .data(numbers(3));
    let mut document = ChartDocument::new();
    document.add(Arc::new(chart)).add(Arc::new(line_on(&cs, 2)));

    let value = decode(&document.assemble().unwrap());
    assert!(value.get("dataset").is_none());
    assert_eq!(value["series"][0]["data"], json!([["a", 0], ["b", 1], ["c", 2]]));
    assert_eq!(value["series"][1]["data"], json!([[0, 0], [1, 1]]));
}

#[test]
fn test_pie_given_a_grid_stays_off_it() {
    let pie = Chart::pie()
        .plot_on(grid())
        .data(Arc::new(CategoryData::labels(["a", "b"])))
        .data(numbers(2));
    let mut document = ChartDocument::new();
    document.add(Arc::new(pie));

    let value = decode(&document.assemble().unwrap());
    assert!(value.get("grid").is_none());
    assert!(value.get("xAxis").is_none());
    let series = value["series"][0].as_object().unwrap();
    assert!(!series.contains_key("coordinateSystem"));
    assert!(!series.contains_key("xAxisIndex"));
    assert_eq!(value["series"][0]["encode"], json!({"itemName": "d0", "value": "d1"}));
}

#[test]
fn test_grid_position_writes_sizes() {
    let cs = Arc::new(
        CoordinateSystem::rectangular()
            .axis(Arc::new(Axis::x(DataType::Number)))
            .axis(Arc::new(Axis::y(DataType::Number)))
            .position(Position::new().left(Size::Percent(10.0)).top(Size::Pixels(40)).width(Size::Center)),
    );
    let mut document = ChartDocument::new();
    document.add(Arc::new(line_on(&cs, 2)));

    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["grid"], json!([{"left": "10%", "top": 40, "width": "center"}]));
}

// ============================================================================
// Passes and skip-data
// ============================================================================

#[test]
fn test_reassembly_is_byte_identical() {
    let cs = grid();
    let mut document = ChartDocument::new();
    document
        .set_title(Some(Title::new("t")))
        .add(Arc::new(line_on(&cs, 3)));
    let first = document.assemble().unwrap();
    let second = document.assemble().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_skip_data_ignored_on_first_pass() {
    let build = || {
        let mut document = ChartDocument::new();
        document.add(Arc::new(line_on(&grid(), 3)));
        document
    };
    let skipped = build().assemble_with(true).unwrap();
    let full = build().assemble().unwrap();
    assert_eq!(skipped, full);
    assert!(decode(&skipped).get("dataset").is_some());
}

#[test]
fn test_skip_data_omits_dataset_but_keeps_references() {
    let cs = grid();
    let mut document = ChartDocument::new();
    document.add(Arc::new(line_on(&cs, 3)));
    let full = decode(&document.assemble().unwrap());

    let partial = decode(&document.assemble_with(true).unwrap());
    assert!(partial.get("dataset").is_none());
    assert_eq!(partial["series"][0]["encode"], full["series"][0]["encode"]);
    assert_eq!(partial["xAxis"], full["xAxis"]);
}

#[test]
fn test_skip_data_omits_inline_data() {
    let mut document = ChartDocument::new();
    let tree = TreeData::new([TreeNode::new("root", 1.0).child(TreeNode::new("leaf", 1.0))]);
    document.add(Arc::new(
        Chart::new(ChartType::Sunburst).data(Arc::new(tree)),
    ));
    let full = decode(&document.assemble().unwrap());
    assert_eq!(full["series"][0]["data"][0]["name"], "root");

    let partial = decode(&document.assemble_with(true).unwrap());
    assert!(partial["series"][0].get("data").is_none());
    assert_eq!(partial["series"][0]["type"], "sunburst");
}

#[test]
fn test_new_data_under_skip_data_is_structural() {
    let cs = grid();
    let mut document = ChartDocument::new();
    document.add(Arc::new(line_on(&cs, 3)));
    document.assemble().unwrap();

    let fresh = Chart::line()
        .plot_on(Arc::clone(&cs))
        .data(Arc::new(NumberData::new([1.0]).named("fresh")))
        .data(numbers(1));
    document.add(Arc::new(fresh));
    let err = document.assemble_with(true).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("fresh"), "{err}");
    assert!(err.to_string().contains("Skipping data but new data found"), "{err}");

    // a full pass still succeeds and sends the new data
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["series"].as_array().unwrap().len(), 2);
}

#[test]
fn test_structural_error_leaves_no_output() {
    let mut document = ChartDocument::new();
    document.add(Arc::new(Chart::bar().named("lonely").data(numbers(1)).data(numbers(1))));
    let err = document.assemble().unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("lonely"));
    assert!(!document.has_been_assembled());
}

// ============================================================================
// Customization and decorations
// ============================================================================

#[test]
fn test_custom_properties_override_built_ins() {
    let chart = line_on(&grid(), 2)
        .named("built-in")
        .property("name", "first")
        .property("name", "second")
        .raw_property(r#""smooth":false"#)
        .raw_property(r#""smooth":true"#);
    let mut document = ChartDocument::new();
    document.add(Arc::new(chart));

    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["series"][0]["name"], "second");
    assert_eq!(value["series"][0]["smooth"], true);
}

#[test]
fn test_later_single_instance_displaces_earlier() {
    let mut document = ChartDocument::new();
    document
        .set_legend(None)
        .add(Arc::new(Tooltip::new().trigger(TooltipTrigger::Item)))
        .add(Arc::new(Tooltip::new().trigger(TooltipTrigger::Axis)));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value, json!({"tooltip": {"trigger": "axis"}}));
}

#[test]
fn test_toolbox_emits_feature_dictionary() {
    let mut document = ChartDocument::new();
    document
        .set_legend(None)
        .set_toolbox(Some(
            Toolbox::new()
                .button(ToolboxButton::Restore {
                    caption: "Reset".into(),
                })
                .button(ToolboxButton::Download {
                    caption: "Save".into(),
                    resolution: 2,
                }),
        ))
        .add(Arc::new(Title::new("only")));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["toolbox"]["tooltip"], json!({"show": true}));
    assert_eq!(value["toolbox"]["feature"]["restore"]["title"], "Reset");
    assert_eq!(value["toolbox"]["feature"]["saveAsImage"]["pixelRatio"], 2);
}

#[test]
fn test_function_strings_are_hoisted() {
    let mut document = ChartDocument::new();
    document
        .set_tooltip(Some(Tooltip::new().formatter("function(p) { return p.name; }")))
        .add(Arc::new(line_on(&grid(), 2)));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["tooltip"]["formatter"], "@function@optionTooltipFormatter");
    assert_eq!(
        value["@function@optionTooltipFormatter"],
        "function optionTooltipFormatter(p) { return p.name; }"
    );
}

#[test]
fn test_function_hoisting_can_be_disabled() {
    let config = AssemblyConfig::new().with_hoist_functions(false);
    let mut document = ChartDocument::with_config(config);
    document
        .set_tooltip(Some(Tooltip::new().formatter("function(p) {}")))
        .add(Arc::new(line_on(&grid(), 2)));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["tooltip"]["formatter"], "function(p) {}");
}

#[test]
fn test_zoom_references_axis_serials() {
    let cs = grid();
    let x = cs.axes()[0].clone();
    let zoom = DataZoom::new(ZoomKind::Slider, Arc::clone(&cs)).axis(x).start(10.0).end(90.0);
    let mut document = ChartDocument::new();
    document.add(Arc::new(line_on(&cs, 2))).add(Arc::new(zoom));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(
        value["dataZoom"],
        json!([{"type": "slider", "xAxisIndex": [0], "start": 10, "end": 90}])
    );
}

#[test]
fn test_polar_chart_uses_polar_index() {
    let polar = Arc::new(
        CoordinateSystem::polar()
            .axis(Arc::new(Axis::angle(DataType::Category)))
            .axis(Arc::new(Axis::radius(DataType::Number))),
    );
    let chart = Chart::bar()
        .plot_on(polar)
        .data(Arc::new(CategoryData::labels(["a", "b"])))
        .data(numbers(2));
    let mut document = ChartDocument::new();
    document.add(Arc::new(chart));
    let value = decode(&document.assemble().unwrap());
    assert_eq!(value["polar"], json!([{}]));
    assert_eq!(value["angleAxis"], json!([{"type": "category"}]));
    assert_eq!(value["series"][0]["coordinateSystem"], "polar");
    assert_eq!(value["series"][0]["encode"], json!({"angle": "d0", "radius": "d1"}));
}

// ============================================================================
// Property-based tests
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_every_reference_points_at_an_emitted_entry(
            lens in prop::collection::vec(1usize..6, 1..6),
        ) {
            let mut document = ChartDocument::new();
            for len in &lens {
                document.add(Arc::new(line_on(&grid(), *len)));
            }
            let value = decode(&document.assemble().unwrap());

            let series = value["series"].as_array().unwrap();
            prop_assert_eq!(series.len(), lens.len());
            let x_axes = value["xAxis"].as_array().unwrap().len();
            let datasets = match &value["dataset"] {
                Value::Array(blocks) => blocks.len(),
                _ => 1,
            };

            for (i, s) in series.iter().enumerate() {
                prop_assert_eq!(s["name"].as_str().unwrap(), format!("Chart {}", i + 1));
                let x = s.get("xAxisIndex").and_then(Value::as_u64).unwrap_or(0);
                prop_assert_eq!(x, i as u64);
                prop_assert!((x as usize) < x_axes);
                let d = s.get("datasetIndex").and_then(Value::as_u64).unwrap_or(0);
                prop_assert!((d as usize) < datasets);
            }
        }

        #[test]
        fn prop_repeated_passes_are_stable(len in 1usize..8, charts in 1usize..4) {
            let cs = grid();
            let mut document = ChartDocument::new();
            for _ in 0..charts {
                document.add(Arc::new(line_on(&cs, len)));
            }
            let first = document.assemble().unwrap();
            prop_assert_eq!(&first, &document.assemble().unwrap());
            let partial = document.assemble_with(true).unwrap();
            prop_assert!(decode(&partial).get("dataset").is_none());
        }
    }
}
