//! Integration tests for limit table restructuring.

use stepdoc::model::{ContentNode, Dropdown, MarkColor};
use stepdoc::render::{
    group_runs, sequence_numbers, Alignment, RenderOptions, SpecLabels, SpecTableTransformer,
    TableCommand,
};

const LIMIT_HEADER: [&str; 7] = [
    "No",
    "Tank",
    "Lower Spec Limit",
    "Lower Operating Limit",
    "Set Point",
    "Upper Operating Limit",
    "Upper Spec Limit",
];

fn limit_table(tanks: &[&str]) -> ContentNode {
    let mut rows = vec![ContentNode::row_from_strings(LIMIT_HEADER)];
    for (i, tank) in tanks.iter().enumerate() {
        rows.push(ContentNode::row_from_strings([
            (i + 1).to_string(),
            tank.to_string(),
            "8".to_string(),
            "9".to_string(),
            "10".to_string(),
            "11".to_string(),
            "12".to_string(),
        ]));
    }
    ContentNode::table(rows)
}

fn transform(table: &ContentNode) -> TableCommand {
    let options = RenderOptions::default();
    SpecTableTransformer::new(&options)
        .transform(table, "$")
        .unwrap()
        .expect("table has data rows")
}

#[test]
fn test_three_columns_replace_five_at_minimum_index() {
    let out = transform(&limit_table(&["T1"]));

    assert_eq!(
        out.columns,
        vec!["No", "Tank", "Set Value", "Operating Value", "Spec Value"]
    );
    assert_eq!(out.column_count(), 5);
    for row in &out.rows {
        assert_eq!(row.len(), 5);
    }
    // No raw limit text leaks into the output
    for label in &LIMIT_HEADER[2..] {
        assert!(!out.columns.iter().any(|c| c == label));
    }
    assert_eq!(out.column_text(2), vec!["10"]);
    assert_eq!(out.column_text(3), vec!["+1/-1\n(9~11)"]);
    assert_eq!(out.column_text(4), vec!["+2/-2\n(8~12)"]);
}

#[test]
fn test_insert_position_follows_first_limit_column() {
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings([
            "Upper Spec Limit",
            "Item",
            "Set Point",
            "Lower Spec Limit",
            "Upper Operating Limit",
            "Lower Operating Limit",
            "Remark",
        ]),
        ContentNode::row_from_strings(["5.5", "Temp", "5.0", "4.0", "5.2", "4.9", "daily"]),
    ]);
    let out = transform(&table);
    assert_eq!(
        out.columns,
        vec!["Set Value", "Operating Value", "Spec Value", "Item", "Remark"]
    );
    assert_eq!(out.column_text(1), vec!["+0.2/-0.1\n(4.9~5.2)"]);
    assert_eq!(out.column_text(2), vec!["+0.5/-1.0\n(4.0~5.5)"]);
    assert_eq!(out.column_text(4), vec!["daily"]);
}

#[test]
fn test_header_labels_matched_after_normalization() {
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings([
            "ＬＯＷＥＲ SPEC LIMIT",
            " lower  operating limit ",
            "Set\u{3000}Point",
            "Upper Operating Limit",
            "Upper Spec Limit",
        ]),
        ContentNode::row_from_strings(["1", "2", "3", "4", "5"]),
    ]);
    let out = transform(&table);
    assert_eq!(out.column_count(), 3);
}

#[test]
fn test_custom_labels() {
    let options = RenderOptions::new().with_spec_labels(SpecLabels {
        lower_spec_limit: "LSL".into(),
        lower_operating_limit: "LOL".into(),
        set_point: "SP".into(),
        upper_operating_limit: "UOL".into(),
        upper_spec_limit: "USL".into(),
    });
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings(["LSL", "LOL", "SP", "UOL", "USL"]),
        ContentNode::row_from_strings(["1", "2", "3", "4", "5"]),
    ]);
    let out = SpecTableTransformer::new(&options)
        .transform(&table, "$")
        .unwrap()
        .unwrap();
    assert_eq!(out.column_text(1), vec!["+1/-1\n(2~4)"]);
}

#[test]
fn test_missing_label_copies_table_verbatim() {
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings(["No", "Tank", "Set Point", "Upper Spec Limit"]),
        ContentNode::row_from_strings(["1", "A", "10", "12"]),
        ContentNode::row_from_strings(["2", "A", "20", "22"]),
    ]);
    let out = transform(&table);

    assert_eq!(out.columns, vec!["No", "Tank", "Set Point", "Upper Spec Limit"]);
    assert_eq!(out.rows.len(), 3);
    assert!(out.merges.is_empty());
    let source: Vec<Vec<String>> = table
        .children()
        .iter()
        .map(|row| row.children().iter().map(|c| c.plain_text()).collect())
        .collect();
    let copied: Vec<Vec<String>> = out
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.plain_text()).collect())
        .collect();
    assert_eq!(copied, source);
    assert!(out.rows[1]
        .iter()
        .all(|c| c.style.alignment == Alignment::Left));
}

#[test]
fn test_slot_groups_merge_and_number() {
    let tanks = ["A", "A", "B", "B", "B", "C"];
    let out = transform(&limit_table(&tanks));

    let runs = group_runs(&tanks);
    assert_eq!(runs.iter().map(|r| r.len).collect::<Vec<_>>(), vec![2, 3, 1]);
    assert_eq!(sequence_numbers(&runs), vec![1, 1, 2, 2, 2, 3]);

    // Slot and sequence cells are written once per group
    assert_eq!(out.column_text(0), vec!["1", "", "2", "", "", "3"]);
    assert_eq!(out.column_text(1), vec!["A", "", "B", "", "", "C"]);

    let tank_spans: Vec<(usize, usize)> = out
        .merges
        .iter()
        .filter(|m| m.first_column == 1)
        .map(|m| (m.first_row, m.row_span()))
        .collect();
    assert_eq!(tank_spans, vec![(1, 2), (3, 3)]);
    assert_eq!(out.merges.iter().filter(|m| m.first_column == 0).count(), 2);
    assert!(out.merges.iter().all(|m| m.first_column == m.last_column));

    let merged = &out.rows[1][1].style;
    assert!(!merged.keep_together);
    assert!(out.rows[1][2].style.keep_together);
}

#[test]
fn test_slot_values_compared_trimmed() {
    let out = transform(&limit_table(&["A", " A ", "A"]));
    assert_eq!(out.merges.len(), 2);
    assert_eq!(out.column_text(0), vec!["1", "", ""]);
}

#[test]
fn test_without_slot_column_rows_are_numbered_individually() {
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings([
            "No",
            "Lower Spec Limit",
            "Lower Operating Limit",
            "Set Point",
            "Upper Operating Limit",
            "Upper Spec Limit",
        ]),
        ContentNode::row_from_strings(["x", "1", "2", "3", "4", "5"]),
        ContentNode::row_from_strings(["y", "1", "2", "3", "4", "5"]),
    ]);
    let out = transform(&table);
    assert_eq!(out.column_text(0), vec!["1", "2"]);
    assert!(out.merges.is_empty());
}

#[test]
fn test_dropdown_cell_value_and_color() {
    let mut cell = ContentNode::cell(vec![]);
    if let ContentNode::TableCell { dropdown, .. } = &mut cell {
        *dropdown = Some(Dropdown {
            value: "7".into(),
            color: Some(MarkColor::Red),
        });
    }
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings(LIMIT_HEADER[2..].iter().copied()),
        ContentNode::row(vec![
            cell,
            ContentNode::cell_text("9"),
            ContentNode::cell_text("10"),
            ContentNode::cell_text("11"),
            ContentNode::cell_text("12"),
        ]),
    ]);
    let out = transform(&table);
    let spec = &out.rows[1][2];
    assert_eq!(spec.plain_text(), "+2/-3\n(7~12)");
    assert_eq!(spec.paragraphs[0][0].color, MarkColor::Red);
    assert_eq!(out.rows[1][1].paragraphs[0][0].color, MarkColor::Black);
}

#[test]
fn test_repeated_limit_label_is_dropped() {
    let table = ContentNode::table(vec![
        ContentNode::row_from_strings([
            "Lower Spec Limit",
            "Lower Operating Limit",
            "Set Point",
            "Upper Operating Limit",
            "Upper Spec Limit",
            "Set Point",
        ]),
        ContentNode::row_from_strings(["1", "2", "3", "4", "5", "3"]),
    ]);
    let out = transform(&table);
    assert_eq!(
        out.columns,
        vec!["Set Value", "Operating Value", "Spec Value"]
    );
    for row in &out.rows {
        assert_eq!(row.len(), 3);
    }
    assert_eq!(out.column_text(0), vec!["3"]);
}
