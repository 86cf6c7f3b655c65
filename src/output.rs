// result rendering - plain text tables the model (and a human) can read

use crate::core::QueryResult;

// cap a column at 40 chars so things don't get crazy
const MAX_COL_WIDTH: usize = 40;

/// Render a query result as an aligned text table. `max_rows` truncates the
/// rendering (not the query) and says so in a trailing note.
pub fn table(result: &QueryResult, max_rows: Option<usize>) -> String {
    if result.rows.is_empty() {
        return "no results".to_string();
    }

    let shown = match max_rows {
        Some(cap) => result.rows.len().min(cap),
        None => result.rows.len(),
    };
    let rows = &result.rows[..shown];

    // figure out column widths, in chars - cell text may be multibyte
    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.chars().count()).collect();

    for row in rows {
        for (i, val) in row.iter().enumerate() {
            let len = format_value(val).chars().count();
            if len > widths[i] {
                widths[i] = len;
            }
        }
    }

    for w in &mut widths {
        if *w > MAX_COL_WIDTH {
            *w = MAX_COL_WIDTH;
        }
    }

    let mut out = String::new();

    // header
    let header: Vec<String> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');

    // separator
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&sep.join("-+-"));
    out.push('\n');

    // rows
    for row in rows {
        let formatted: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let s = format_value(v);
                let s = if s.chars().count() > MAX_COL_WIDTH {
                    // char boundaries, never byte offsets
                    let kept: String = s.chars().take(MAX_COL_WIDTH - 3).collect();
                    format!("{kept}...")
                } else {
                    s
                };
                format!("{:width$}", s, width = widths[i])
            })
            .collect();
        out.push_str(&formatted.join(" | "));
        out.push('\n');
    }

    if shown < result.row_count {
        out.push_str(&format!(
            "({shown} of {} rows shown)\n",
            result.row_count
        ));
    } else {
        out.push_str(&format!("({} rows)\n", result.row_count));
    }

    out
}

fn format_value(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => val.to_string(),
    }
}
