use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::warn;

use juwura_seed_core::generate::engine::generate_with_progress;
use juwura_seed_core::generate::Stage;
use juwura_seed_core::output;
use juwura_seed_core::seed::{acquire_seed, fresh_seed, write_seed_record, SeedSource};

use crate::args::{GenerateArgs, OutputFormat};
use crate::commands::{load_config, spinner};

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    // Nothing is recorded or written for a config that cannot generate.
    config.validate()?;

    let (seed, _) = resolve_seed(args);

    let record = write_seed_record(&args.record_dir, seed)?;
    eprintln!("Creating with seed: {} (recorded in {})", seed, record.display());

    let pb = spinner("1/2", "Generating rows...")?;
    let progress = |stage: Stage, rows: usize| {
        pb.set_message(format!("Generating rows... {} ({} rows)", stage, rows));
    };
    let script = generate_with_progress(&config, seed, Some(&progress))?;
    pb.finish_with_message(format!(
        "Generating rows... ✓ {} rows across {} tables",
        script.total_rows(),
        script.batches.len()
    ));

    let format = args.output_format();
    let pb = spinner("2/2", "Writing script...")?;
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_output(&mut writer, &script, &format)?;
            writer.flush().context("Failed to flush output file")?;
            pb.finish_with_message(format!("Writing script... ✓ {}", path.display()));
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_output(&mut writer, &script, &format)?;
            writer.flush().context("Failed to flush stdout")?;
            pb.finish_and_clear();
        }
    }

    Ok(())
}

/// Seed precedence: `--seed`, then `--seed-file`, then the first line of stdin.
fn resolve_seed(args: &GenerateArgs) -> (i64, SeedSource) {
    if let Some(seed) = args.seed {
        return (seed, SeedSource::Provided);
    }
    if let Some(path) = &args.seed_file {
        return match File::open(path) {
            Ok(file) => acquire_seed(BufReader::new(file)),
            Err(e) => {
                warn!("Can't open seed file {}: {}, generating a new one", path.display(), e);
                (fresh_seed(), SeedSource::Fallback)
            }
        };
    }
    acquire_seed(io::stdin().lock())
}

fn write_output<W: Write>(
    writer: &mut W,
    script: &juwura_seed_core::GeneratedScript,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Sql => output::sql::write_script(writer, script)?,
        OutputFormat::Json => output::json::write_json(writer, script)?,
    }
    Ok(())
}
