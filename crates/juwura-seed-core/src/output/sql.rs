//! # SQL Script Writer
//!
//! Renders each `TableBatch` as a single multi-row `INSERT` statement, one
//! tuple per line, and writes the whole script behind a `\c <database>`
//! directive.

use std::io::Write;

use crate::error::{Result, SeedError};
use crate::generate::engine::GeneratedScript;
use crate::generate::stages::TableBatch;

/// Format one batch as a multi-row INSERT statement.
///
/// Every tuple but the last ends with `,`; the last ends with `;`. An empty
/// batch yields an empty string so no dangling header is ever written.
pub fn format_batch(batch: &TableBatch) -> String {
    if batch.is_empty() {
        return String::new();
    }

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES\n",
        batch.table(),
        batch.columns().join(", ")
    );

    let last = batch.len() - 1;
    for (i, row) in batch.rows.iter().enumerate() {
        let values: Vec<String> = row.iter().map(|v| v.to_sql_literal()).collect();
        sql.push('(');
        sql.push_str(&values.join(", "));
        sql.push(')');
        sql.push(if i == last { ';' } else { ',' });
        sql.push('\n');
    }

    sql
}

/// Write the full script: directive line, then every non-empty batch in
/// pipeline order, each followed by a blank line.
pub fn write_script<W: Write>(writer: &mut W, script: &GeneratedScript) -> Result<()> {
    writeln!(writer, "\\c {}", script.database).map_err(|e| SeedError::Output {
        message: "writing database directive".to_string(),
        source: e,
    })?;

    for batch in script.batches.values() {
        if batch.is_empty() {
            continue;
        }
        writeln!(writer, "{}", format_batch(batch)).map_err(|e| SeedError::Output {
            message: format!("writing batch for {}", batch.table()),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| SeedError::Output {
        message: "flushing script".to_string(),
        source: e,
    })
}
