use anyhow::Result;
use comfy_table::Table as ComfyTable;

use juwura_seed_core::generate::engine::generate;

use crate::args::PreviewArgs;
use crate::commands::load_config;

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let script = generate(&config, args.seed)?;

    println!("Seed {} → database {}\n", script.seed, script.database);

    let mut summary = ComfyTable::new();
    summary.set_header(vec!["table", "rows", "id range"]);
    for (table, batch) in &script.batches {
        let range = script
            .id_ranges
            .get(table)
            .filter(|r| !r.is_empty())
            .map(|r| format!("{}..={}", r.start(), r.end()))
            .unwrap_or_else(|| "-".to_string());
        summary.add_row(vec![table.to_string(), batch.len().to_string(), range]);
    }
    println!("{}\n", summary);

    if args.sample == 0 {
        return Ok(());
    }

    for (table, batch) in &script.batches {
        if batch.is_empty() {
            continue;
        }

        println!("━━━ {} ({} rows) ━━━", table, batch.len());

        let mut t = ComfyTable::new();
        t.set_header(batch.columns().to_vec());
        for row in batch.rows.iter().take(args.sample) {
            t.add_row(row.iter().map(|v| truncate(&v.to_sql_literal(), 40)));
        }

        println!("{}\n", t);
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
