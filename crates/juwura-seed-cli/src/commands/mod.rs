pub mod generate;
pub mod graph;
pub mod preview;

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use juwura_seed_core::config::{read_config, read_config_file, GeneratorConfig};

use crate::args::ConfigArgs;

/// Resolve the generator config: `--config`, else `./juwura-seed.toml` when
/// present, else the built-in defaults; then apply the CLI overrides.
pub fn load_config(args: &ConfigArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => read_config(Path::new("."))?.unwrap_or_default(),
    };

    if let Some(users) = args.users {
        config.counts.users = users;
    }
    if let Some(projects) = args.projects {
        config.counts.projects = projects;
    }
    if let Some(tasks) = args.tasks_per_project {
        config.counts.tasks_per_project = tasks;
    }
    if args.assignee_table {
        config.schema.assignee_table = true;
    }

    Ok(config)
}

/// A stderr spinner for one phase of a command.
pub fn spinner(prefix: &str, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} [{prefix}] {msg}")?);
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied_on_top_of_defaults() {
        let args = ConfigArgs {
            users: Some(20),
            tasks_per_project: Some(3),
            assignee_table: true,
            ..Default::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.counts.users, 20);
        assert_eq!(config.counts.tasks_per_project, 3);
        assert_eq!(config.counts.projects, 5);
        assert!(config.schema.assignee_table);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = ConfigArgs {
            config: Some("/nonexistent/juwura-seed.toml".into()),
            ..Default::default()
        };
        assert!(load_config(&args).is_err());
    }
}
