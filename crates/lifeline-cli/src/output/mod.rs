use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let width = table::terminal_width();
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items, width)),
        Value::Object(map) => {
            let rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render(&["field", "value"], &rows, width))
        }
        scalar => Ok(value_to_cell(&scalar)),
    }
}

/// One row per object; columns are the union of keys in first-seen order.
fn render_rows(items: &[Value], width: Option<usize>) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        let rows = items.iter().map(|v| vec![value_to_cell(v)]).collect::<Vec<_>>();
        return table::render(&["value"], &rows, width);
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|h| item.get(h).map_or_else(|| String::from("-"), value_to_cell))
                .collect()
        })
        .collect::<Vec<Vec<String>>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render(&header_refs, &rows, width)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => if *v { "yes" } else { "no" }.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Bank {
        name: &'static str,
        city: &'static str,
        #[serde(rename = "isVerified")]
        is_verified: bool,
    }

    #[test]
    fn json_render_is_pretty() {
        let out = render(
            &Bank {
                name: "KEM",
                city: "Mumbai",
                is_verified: true,
            },
            OutputFormat::Json,
        )
        .expect("render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(parsed["city"], "Mumbai");
        assert!(out.contains('\n'));
    }

    #[test]
    fn raw_render_is_single_line() {
        let out = render(&vec!["O-", "A+"], OutputFormat::Raw).expect("render");
        assert_eq!(out, r#"["O-","A+"]"#);
    }

    #[test]
    fn table_render_lists_rows_in_order() {
        let banks = vec![
            Bank {
                name: "AIIMS",
                city: "Delhi",
                is_verified: true,
            },
            Bank {
                name: "KEM",
                city: "Mumbai",
                is_verified: false,
            },
        ];
        let out = render(&banks, OutputFormat::Table).expect("render");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("city"));
        assert!(lines[0].contains("name"));
        assert!(lines[2].contains("AIIMS") && lines[2].contains("yes"));
        assert!(lines[3].contains("KEM") && lines[3].contains("no"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&Vec::<Bank>::new(), OutputFormat::Table).expect("render");
        assert_eq!(out, "(no rows)");
    }
}
