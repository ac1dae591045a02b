//! # Configuration
//!
//! Everything the pipeline needs besides the seed: row counts, null/default
//! probabilities, content pools and the per-project task field layout. The
//! defaults reproduce the reference Juwura seed script; an optional
//! `juwura-seed.toml` overrides any subset of them:
//!
//! ```toml
//! [schema]
//! database = "juwura"
//! assignee_table = true
//!
//! [counts]
//! users = 20
//! tasks_per_project = 30
//!
//! [probabilities]
//! task_parent_null = 0.7
//!
//! [pools]
//! emojis = ["🦀", "🐙"]
//!
//! [[fields]]
//! name = "Status"
//! kind = "CHOICE"
//! values = ["BACKLOG", "TODO", "DONE"]
//! ```
//!
//! A `[[fields]]` list replaces the whole default layout.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SeedError};
use crate::generate::field::FieldKind;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "juwura-seed.toml";

/// Top-level generator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target database and schema variant.
    pub schema: SchemaConfig,
    /// Row counts per table / per parent row.
    pub counts: CountConfig,
    /// Gate probabilities for nullable or defaultable columns.
    pub probabilities: ProbabilityConfig,
    /// Opaque content lookup tables.
    pub pools: PoolConfig,
    /// Task field type names emitted once per project, in id order.
    #[serde(default = "default_field_types")]
    pub field_types: Vec<FieldKind>,
    /// Task field layout emitted once per project, in id order.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            counts: CountConfig::default(),
            probabilities: ProbabilityConfig::default(),
            pools: PoolConfig::default(),
            field_types: default_field_types(),
            fields: default_fields(),
        }
    }
}

/// Target database settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Database selected by the directive on the first line of the script.
    pub database: String,
    /// Emit the separate `task_assignee` table.
    pub assignee_table: bool,
    /// Domain of the deterministic user emails.
    pub email_domain: String,
    /// Prefix of every project name.
    pub project_name_prefix: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            database: "juwura".to_string(),
            assignee_table: false,
            email_domain: "gmail.com".to_string(),
            project_name_prefix: "Proyecto ".to_string(),
        }
    }
}

/// Row-count policy for every stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountConfig {
    pub users: usize,
    pub projects: usize,
    pub members_per_project: usize,
    pub tasks_per_project: usize,
    pub relations_per_project: usize,
    /// DATE values are `NOW() + n days` with `n` in `[0, due_date_span_days)`.
    pub due_date_span_days: usize,
    /// NUMBER values are drawn from `[1, sprint_max]`.
    pub sprint_max: usize,
    /// Upper bound of the list length of an ASSIGNEE value.
    pub max_assignees: usize,
    /// Upper bound of `task_assignee` rows per task (assignee-table variant).
    pub assignees_per_task_max: usize,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            users: 8,
            projects: 5,
            members_per_project: 3,
            tasks_per_project: 10,
            relations_per_project: 5,
            due_date_span_days: 20,
            sprint_max: 15,
            max_assignees: 1,
            assignees_per_task_max: 2,
        }
    }
}

/// Gate probabilities. Each is the chance of emitting the marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbabilityConfig {
    /// `project_member.is_pinned`: DEFAULT instead of `true`.
    pub member_pinned_default: f64,
    /// `task.parent_id`: NULL instead of an earlier task of the project.
    pub task_parent_null: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            member_pinned_default: 0.5,
            task_parent_null: 0.5,
        }
    }
}

/// Content pools. Generators treat them as opaque lookup tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub names: Vec<String>,
    pub profile_pictures: Vec<String>,
    pub emojis: Vec<String>,
    pub project_banners: Vec<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            names: strings(&[
                "Naruto Uzumaki",
                "Goku",
                "Luffy",
                "Ichigo Kurosaki",
                "Mikasa Ackerman",
                "Natsu Dragneel",
                "Sakura Haruno",
                "Levi Ackerman",
                "Eren Yeager",
                "Light Yagami",
                "Kirito",
                "Hinata Hyuga",
                "Rem",
                "Saber",
                "Edward Elric",
                "Kenshin Himura",
                "Rin Tohsaka",
                "Asta",
                "Jotaro Kujo",
                "Yugi Muto",
                "Bulma",
                "Kaguya Shinomiya",
                "Tanjiro Kamado",
                "Homura Akemi",
                "Shoto Todoroki",
            ]),
            profile_pictures: strings(&[
                "https://i.pinimg.com/474x/ce/01/a8/ce01a81ede670b25c1fe42ab53372be9.jpg",
                "https://pbs.twimg.com/profile_images/701573331661799424/Nz7S_Oie_400x400.png",
                "https://i.pinimg.com/474x/06/b6/d8/06b6d809fe220068117a61eea418c6c2.jpg",
                "https://windybot.com/thumb/0VdsmdWEquyKfjKEBH78.jpg",
                "https://i.pinimg.com/550x/ce/7f/68/ce7f6822998fc0a56c23c1c7a13c6483.jpg",
            ]),
            emojis: strings(&[
                "😀", "😋", "😎", "👺", "👽", "🤖", "😺", "😸", "😼", "🗣", "👑", "🎩",
            ]),
            project_banners: strings(&[
                "https://img.freepik.com/free-photo/painting-mountain-lake-with-mountain-background_188544-9126.jpg",
                "https://images3.alphacoders.com/135/1350069.jpeg",
                "https://image-0.uhdpaper.com/wallpaper/sports-car-futuristic-mountain-sunset-scenery-digital-art-hd-wallpaper-uhdpaper.com-537@0@i.jpg",
            ]),
        }
    }
}

/// One custom task field of the per-project layout.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    /// Display name stored in `task_field.name`.
    pub name: String,
    /// Declared type; decides how values are shaped.
    pub kind: FieldKind,
    /// Options of a CHOICE field, or the content pool of a TEXT field.
    #[serde(default)]
    pub values: Vec<String>,
    /// Chance that a task holds NULL for this field.
    #[serde(default = "default_null_probability")]
    pub null_probability: f64,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            values: strings(values),
            null_probability: default_null_probability(),
        }
    }
}

fn default_null_probability() -> f64 {
    0.5
}

fn default_field_types() -> Vec<FieldKind> {
    FieldKind::ALL.to_vec()
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "Title",
            FieldKind::Text,
            &[
                "Programar endpoints del backend",
                "Ganar en TheFinals",
                "Terminar migración de JIRA a JUWURA",
                "Terminar de reescribir el universo en Rust",
                "Terminar script de migración",
                "POC: ¿Qué audífonos gamer comprar?",
            ],
        ),
        FieldSpec::new("Due Date", FieldKind::Date, &[]),
        FieldSpec::new("Status", FieldKind::Choice, &["TODO", "DOING", "DONE"]),
        FieldSpec::new("Priority", FieldKind::Choice, &["HIGH", "MEDIUM", "LOW"]),
        FieldSpec::new("Sprint", FieldKind::Number, &[]),
        FieldSpec::new("Assignees", FieldKind::Assignee, &[]),
        FieldSpec::new("Description", FieldKind::Text, &["This is a test description!"]),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Read `juwura-seed.toml` from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
pub fn read_config(dir: &Path) -> Result<Option<GeneratorConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    read_config_file(&path).map(Some)
}

/// Read and validate an explicit config file.
pub fn read_config_file(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SeedError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    let config = parse_config(&content).map_err(|e| match e {
        SeedError::Config { message } => SeedError::Config {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;
    Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = toml::from_str(content).map_err(|e| SeedError::Config {
        message: format!("Failed to parse config: {}", e),
    })?;
    config.validate()?;
    Ok(config)
}

impl GeneratorConfig {
    /// Position of a field kind in the per-project type block.
    pub fn field_type_index(&self, kind: FieldKind) -> Option<usize> {
        self.field_types.iter().position(|k| *k == kind)
    }

    /// Validate everything serde cannot enforce.
    ///
    /// Runs before any stage so a bad config never produces partial output.
    pub fn validate(&self) -> Result<()> {
        let c = &self.counts;
        for (name, value) in [
            ("counts.users", c.users),
            ("counts.projects", c.projects),
            ("counts.members_per_project", c.members_per_project),
            ("counts.tasks_per_project", c.tasks_per_project),
            ("counts.due_date_span_days", c.due_date_span_days),
            ("counts.sprint_max", c.sprint_max),
            ("counts.max_assignees", c.max_assignees),
        ] {
            if value == 0 {
                return Err(SeedError::config(format!("{} must be at least 1", name)));
            }
        }
        if c.members_per_project > c.users {
            return Err(SeedError::config(format!(
                "counts.members_per_project ({}) exceeds counts.users ({}); members are distinct users",
                c.members_per_project, c.users
            )));
        }
        if c.relations_per_project > 0 && c.tasks_per_project < 2 {
            return Err(SeedError::config(
                "counts.relations_per_project needs at least 2 tasks per project to connect",
            ));
        }

        for (name, pool) in [
            ("pools.names", &self.pools.names),
            ("pools.profile_pictures", &self.pools.profile_pictures),
            ("pools.emojis", &self.pools.emojis),
            ("pools.project_banners", &self.pools.project_banners),
        ] {
            if pool.is_empty() {
                return Err(SeedError::config(format!("{} must not be empty", name)));
            }
        }

        for (name, p) in [
            ("probabilities.member_pinned_default", self.probabilities.member_pinned_default),
            ("probabilities.task_parent_null", self.probabilities.task_parent_null),
        ] {
            check_probability(name, p)?;
        }

        if self.field_types.is_empty() {
            return Err(SeedError::config("field_types must not be empty"));
        }
        let mut seen = HashSet::new();
        for kind in &self.field_types {
            if !seen.insert(*kind) {
                return Err(SeedError::config(format!(
                    "field_types lists {} more than once",
                    kind
                )));
            }
        }

        if self.fields.is_empty() {
            return Err(SeedError::config("fields must not be empty"));
        }
        for field in &self.fields {
            if self.field_type_index(field.kind).is_none() {
                return Err(SeedError::config(format!(
                    "Field '{}' has type {} which is not listed in field_types",
                    field.name, field.kind
                )));
            }
            if field.kind.needs_values() && field.values.is_empty() {
                return Err(SeedError::config(format!(
                    "Field '{}' of type {} needs a non-empty values list",
                    field.name, field.kind
                )));
            }
            check_probability(
                &format!("fields.{}.null_probability", field.name),
                field.null_probability,
            )?;
        }

        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SeedError::config(format!(
            "{} must be within [0, 1], got {}",
            name, p
        )));
    }
    Ok(())
}
