use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "juwura-seed",
    about = "Emit reproducible, referentially consistent seed scripts for the Juwura database",
    version,
    after_help = "Examples:\n  echo 42 | juwura-seed generate > seed.sql\n  juwura-seed generate --seed 42 --output seed.sql\n  juwura-seed generate --seed-file 42.seed      # replay a recorded run\n  juwura-seed preview --seed 42\n  juwura-seed graph --format dot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the seed script
    Generate(GenerateArgs),

    /// Summarize the tables a seed would produce without writing a script
    Preview(PreviewArgs),

    /// Visualize the stage dependency graph
    Graph(GraphArgs),
}

/// Settings that override `juwura-seed.toml`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Config file (default: ./juwura-seed.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of users
    #[arg(long)]
    pub users: Option<usize>,

    /// Number of projects
    #[arg(long)]
    pub projects: Option<usize>,

    /// Tasks generated for every project
    #[arg(long)]
    pub tasks_per_project: Option<usize>,

    /// Also emit the task_assignee table
    #[arg(long)]
    pub assignee_table: bool,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Seed for the run; read from stdin when neither this nor --seed-file is given
    #[arg(long, allow_negative_numbers = true, conflicts_with = "seed_file")]
    pub seed: Option<i64>,

    /// Read the seed from the first line of this file (e.g. a recorded 42.seed)
    #[arg(long)]
    pub seed_file: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from file extension if not specified)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Directory the <seed>.seed record is written to
    #[arg(long, default_value = ".")]
    pub record_dir: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Seed to preview
    #[arg(long, default_value = "42", allow_negative_numbers = true)]
    pub seed: i64,

    /// Also print the first N rows of every table
    #[arg(long, default_value = "0")]
    pub sample: usize,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Output format for the dependency graph
    #[arg(long, default_value = "mermaid")]
    pub format: GraphFormat,

    /// Include the task_assignee stage
    #[arg(long)]
    pub assignee_table: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Sql,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl GenerateArgs {
    /// Determine output format from the explicit flag or the file extension.
    pub fn output_format(&self) -> OutputFormat {
        if let Some(ref fmt) = self.format {
            return fmt.clone();
        }
        match &self.output {
            Some(path) if path.extension().is_some_and(|ext| ext == "json") => OutputFormat::Json,
            _ => OutputFormat::Sql,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_generate_defaults() {
        let cli = parse(&["juwura-seed", "generate"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.seed, None);
        assert_eq!(args.record_dir, PathBuf::from("."));
        assert_eq!(args.output_format(), OutputFormat::Sql);
    }

    #[test]
    fn test_negative_seed_accepted() {
        let cli = parse(&["juwura-seed", "generate", "--seed", "-5"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.seed, Some(-5));
    }

    #[test]
    fn test_format_from_extension() {
        let cli = parse(&["juwura-seed", "generate", "--output", "out.json"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_seed_and_seed_file_conflict() {
        let result = Cli::try_parse_from([
            "juwura-seed",
            "generate",
            "--seed",
            "1",
            "--seed-file",
            "1.seed",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_overrides_parsed() {
        let cli = parse(&[
            "juwura-seed",
            "preview",
            "--users",
            "12",
            "--tasks-per-project",
            "4",
            "--assignee-table",
        ]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.seed, 42);
        assert_eq!(args.config.users, Some(12));
        assert_eq!(args.config.tasks_per_project, Some(4));
        assert!(args.config.assignee_table);
    }
}
