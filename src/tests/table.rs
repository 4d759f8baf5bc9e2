use super::{parse_table_text, parse_table_text_with, Row};

fn plain(fields: &[&str]) -> Row {
    Row::Plain(fields.iter().map(|f| (*f).to_string()).collect())
}

fn header(fields: &[&str]) -> Row {
    Row::Header(fields.iter().map(|f| (*f).to_string()).collect())
}

#[test]
fn test_two_row_run_promotes_first_row() {
    let table = parse_table_text("a\tb\nc\td\n");

    assert_eq!(table.rows, vec![header(&["a", "b"]), plain(&["c", "d"])]);
}

#[test]
fn test_single_row_never_becomes_header() {
    let table = parse_table_text("a\tb\n");

    assert_eq!(table.rows, vec![plain(&["a", "b"])]);
    assert_eq!(table.headers().count(), 0);
}

#[test]
fn test_empty_text_yields_no_rows() {
    assert!(parse_table_text("").is_empty());
    assert!(parse_table_text("\n  \n\t\n").is_empty());
}

#[test]
fn test_mixed_widths_only_promote_longer_runs() {
    let table = parse_table_text("a\nb\tc\td\ne\tf\tg\n");

    assert_eq!(
        table.rows,
        vec![
            plain(&["a"]),
            header(&["b", "c", "d"]),
            plain(&["e", "f", "g"]),
        ]
    );
}

#[test]
fn test_each_run_gets_its_own_header() {
    let table = parse_table_text("h1\th2\n1\t2\n3\t4\nnote\nx\ty\tz\n5\t6\t7\n");

    assert_eq!(table.len(), 6);
    let header_positions: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_header())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(header_positions, vec![0, 4]);
}

#[test]
fn test_fields_are_not_trimmed() {
    let table = parse_table_text(" a \t\tb \r\n");

    assert_eq!(table.rows, vec![plain(&[" a ", "", "b "])]);
}

#[test]
fn test_custom_delimiter() {
    let table = parse_table_text_with("x,y\n1,2\n", ',');

    assert_eq!(table.rows, vec![header(&["x", "y"]), plain(&["1", "2"])]);
}

#[test]
fn test_serialises_in_clipboard_shape() {
    let table = parse_table_text("a\tb\nc\td\n");
    let json = serde_json::to_value(&table).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "children": [
                {"type": "row", "children": [
                    {"type": "header", "children": [
                        {"type": "field", "value": "a"},
                        {"type": "field", "value": "b"}
                    ]}
                ]},
                {"type": "row", "children": [
                    {"type": "field", "value": "c"},
                    {"type": "field", "value": "d"}
                ]}
            ]
        })
    );
}
