use std::io::Write;

use crate::error::{Result, SeedError};
use crate::generate::engine::GeneratedScript;
use crate::generate::value::Value;

/// Write the generated batches as JSON using streaming serialization.
///
/// Rows are written one at a time rather than built into a single tree.
/// Columns holding the `DEFAULT` marker are left out of their row object, so
/// a loader applies the column default exactly as the SQL script would.
pub fn write_json<W: Write>(writer: &mut W, script: &GeneratedScript) -> Result<()> {
    write_str(writer, "{\n")?;
    write_str(writer, &format!("  \"seed\": {},\n", script.seed))?;
    write_str(
        writer,
        &format!("  \"database\": {},\n", json_string(&script.database)?),
    )?;
    write_str(writer, "  \"tables\": {")?;

    let table_count = script.batches.len();
    for (table_idx, (table, batch)) in script.batches.iter().enumerate() {
        write_str(writer, &format!("\n    {}: [", json_string(table)?))?;

        for (row_idx, row) in batch.rows.iter().enumerate() {
            write_str(writer, "\n      {")?;
            let cells: Vec<(&str, &Value)> = batch
                .columns()
                .iter()
                .copied()
                .zip(row.iter())
                .filter(|(_, v)| !matches!(v, Value::Default))
                .collect();
            for (col_idx, (column, value)) in cells.iter().enumerate() {
                write_str(
                    writer,
                    &format!("{}: {}", json_string(column)?, json_value(value)?),
                )?;
                if col_idx < cells.len() - 1 {
                    write_str(writer, ", ")?;
                }
            }
            write_str(writer, "}")?;
            if row_idx < batch.len() - 1 {
                write_str(writer, ",")?;
            }
        }

        if !batch.is_empty() {
            write_str(writer, "\n    ")?;
        }
        write_str(writer, "]")?;
        if table_idx < table_count - 1 {
            write_str(writer, ",")?;
        }
    }

    write_str(writer, "\n  }\n}\n")?;
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    writer
        .write_all(s.as_bytes())
        .map_err(|e| SeedError::Output {
            message: "writing JSON".to_string(),
            source: e,
        })
}

fn json_string(s: &str) -> Result<String> {
    serde_json::to_string(s).map_err(|e| SeedError::Output {
        message: "serializing JSON string".to_string(),
        source: e.into(),
    })
}

fn json_value(value: &Value) -> Result<String> {
    serde_json::to_string(&value_to_json(value)).map_err(|e| SeedError::Output {
        message: "serializing JSON value".to_string(),
        source: e.into(),
    })
}

/// SQL expressions such as `NOW() + interval '3 day'` are kept as their text.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null | Value::Default => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(*i),
        Value::Text(s) | Value::Expr(s) => serde_json::Value::String(s.clone()),
        Value::Json(j) => j.clone(),
    }
}
