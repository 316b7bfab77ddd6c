use proptest::prelude::*;
use std::collections::HashSet;

use tabviz::data::{Cell, Row};
use tabviz::palette::{color_for, CATEGORY10};
use tabviz::resolve::Selection;
use tabviz::transform::aggregate;
use tabviz::{ChartKind, VisualizerOptions};

fn make_rows(cells: &[(u8, i32, u8)]) -> Vec<Row> {
    cells
        .iter()
        .map(|(key, value, group)| {
            let mut row = Row::new();
            row.insert("k".to_string(), Cell::Text(format!("k{}", key)));
            row.insert("v".to_string(), Cell::Number(*value as f64));
            row.insert("g".to_string(), Cell::Text(format!("g{}", group)));
            row
        })
        .collect()
}

fn selection(kind: ChartKind, secondary: Option<&str>) -> Selection {
    Selection {
        primary_column: "k".to_string(),
        value_column: "v".to_string(),
        secondary_column: secondary.map(str::to_string),
        kind,
    }
}

fn kind_strategy() -> impl Strategy<Value = ChartKind> {
    prop_oneof![Just(ChartKind::Bar), Just(ChartKind::Pie), Just(ChartKind::Area)]
}

proptest! {
    #[test]
    fn sums_are_preserved_under_the_cap(
        cells in prop::collection::vec((0u8..10, -1000i32..1000, 0u8..4), 0..60),
    ) {
        let rows = make_rows(&cells);
        let out = aggregate(&rows, &selection(ChartKind::Bar, None), &VisualizerOptions::default());
        let expected: f64 = cells.iter().map(|(_, v, _)| *v as f64).sum();
        let actual: f64 = out.points.iter().map(|p| p.value()).sum();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn ungrouped_points_are_sorted_and_capped(
        cells in prop::collection::vec((0u8..50, -1000i32..1000, 0u8..4), 0..200),
        kind in kind_strategy(),
    ) {
        let rows = make_rows(&cells);
        let out = aggregate(&rows, &selection(kind, None), &VisualizerOptions::default());
        let cap = if kind == ChartKind::Pie { 10 } else { 20 };
        prop_assert!(out.points.len() <= cap);
        for pair in out.points.windows(2) {
            prop_assert!(pair[0].value() >= pair[1].value());
        }
    }

    #[test]
    fn grouped_points_have_one_field_per_category(
        cells in prop::collection::vec((0u8..30, -1000i32..1000, 0u8..6), 1..120),
    ) {
        let rows = make_rows(&cells);
        let options = VisualizerOptions::default();
        let out = aggregate(&rows, &selection(ChartKind::Bar, Some("g")), &options);

        let distinct: HashSet<u8> = cells.iter().map(|(_, _, g)| *g).collect();
        prop_assert_eq!(out.categories.len(), distinct.len());
        prop_assert!(out.points.len() <= 20);

        let keys: Vec<&str> = out.categories.iter().map(|c| c.key.as_str()).collect();
        for point in &out.points {
            let fields: Vec<&str> = point.values.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(&fields, &keys);
        }
    }

    #[test]
    fn aggregate_is_idempotent(
        cells in prop::collection::vec((0u8..30, -1000i32..1000, 0u8..6), 0..80),
        kind in kind_strategy(),
        grouped in any::<bool>(),
    ) {
        let rows = make_rows(&cells);
        let sel = selection(kind, if grouped { Some("g") } else { None });
        let opts = VisualizerOptions::default();
        prop_assert_eq!(aggregate(&rows, &sel, &opts), aggregate(&rows, &sel, &opts));
    }

    #[test]
    fn colors_cycle_with_the_palette(index in 0usize..1000, k in 0usize..100) {
        prop_assert_eq!(color_for(index), color_for(index + k * CATEGORY10.len()));
    }
}
