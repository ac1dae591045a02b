use std::ops::RangeInclusive;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{Result, SeedError};
use crate::generate::ids::IdAllocator;
use crate::generate::stages::{self, Members, TableBatch, Users};
use crate::generate::Stage;
use crate::graph::topo::verify_order;
use crate::random::SeededStream;

/// The result of running the whole pipeline for one seed.
#[derive(Debug)]
pub struct GeneratedScript {
    /// Seed the stream was created from.
    pub seed: i64,
    /// Database selected by the script's directive line.
    pub database: String,
    /// One batch per stage, in pipeline order. IndexMap keeps the insertion
    /// order, which is the order the script must execute in.
    pub batches: IndexMap<&'static str, TableBatch>,
    /// Serial id range of every table that has one.
    pub id_ranges: IndexMap<&'static str, RangeInclusive<i64>>,
}

impl GeneratedScript {
    pub fn batch(&self, table: &str) -> Option<&TableBatch> {
        self.batches.get(table)
    }

    pub fn total_rows(&self) -> usize {
        self.batches.values().map(|b| b.len()).sum()
    }
}

/// State produced by finished stages. A slot is filled exactly once.
#[derive(Default)]
struct PipelineState {
    users: Option<Users>,
    projects: Option<IdAllocator>,
    members: Option<Members>,
    field_types: Option<IdAllocator>,
    fields: Option<IdAllocator>,
    tasks: Option<IdAllocator>,
}

fn need<'a, T>(slot: &'a Option<T>, stage: Stage, dependency: Stage) -> Result<&'a T> {
    slot.as_ref().ok_or_else(|| SeedError::StageOrder {
        stage: stage.to_string(),
        dependency: dependency.to_string(),
    })
}

/// Generate the full script for `seed` with the configured stage order.
pub fn generate(config: &GeneratorConfig, seed: i64) -> Result<GeneratedScript> {
    generate_with_progress(config, seed, None)
}

/// Like `generate`, calling `progress_callback(stage, rows)` after each stage.
pub fn generate_with_progress(
    config: &GeneratorConfig,
    seed: i64,
    progress_callback: Option<&dyn Fn(Stage, usize)>,
) -> Result<GeneratedScript> {
    let stages = Stage::pipeline(config.schema.assignee_table);
    run_stages(config, seed, &stages, progress_callback)
}

/// Run an explicit list of stages.
///
/// The config is validated and the order checked against the stage graph
/// before the first draw, so a bad config or order never yields a partial
/// script.
pub fn run_stages(
    config: &GeneratorConfig,
    seed: i64,
    stages: &[Stage],
    progress_callback: Option<&dyn Fn(Stage, usize)>,
) -> Result<GeneratedScript> {
    config.validate()?;
    verify_order(stages)?;

    let mut stream = SeededStream::new(seed);
    info!("Generating seed script with seed {}", stream.seed());
    let mut state = PipelineState::default();
    let mut script = GeneratedScript {
        seed,
        database: config.schema.database.clone(),
        batches: IndexMap::new(),
        id_ranges: IndexMap::new(),
    };

    for &stage in stages {
        let batch = run_stage(stage, config, &mut stream, &mut state, &mut script)?;
        debug!("Stage {} produced {} rows", stage, batch.len());
        if let Some(cb) = progress_callback {
            cb(stage, batch.len());
        }
        script.batches.insert(stage.table(), batch);
    }

    Ok(script)
}

fn run_stage(
    stage: Stage,
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    state: &mut PipelineState,
    script: &mut GeneratedScript,
) -> Result<TableBatch> {
    let batch = match stage {
        Stage::Users => {
            let (batch, users) = stages::generate_users(config, stream)?;
            script.id_ranges.insert(stage.table(), users.ids.global_range());
            state.users = Some(users);
            batch
        }
        Stage::Projects => {
            let users = need(&state.users, stage, Stage::Users)?;
            let (batch, projects) = stages::generate_projects(config, stream, users)?;
            script.id_ranges.insert(stage.table(), projects.global_range());
            state.projects = Some(projects);
            batch
        }
        Stage::ProjectMembers => {
            let users = need(&state.users, stage, Stage::Users)?;
            let projects = need(&state.projects, stage, Stage::Projects)?;
            let (batch, members) = stages::generate_members(config, stream, users, projects);
            state.members = Some(members);
            batch
        }
        Stage::TaskFieldTypes => {
            let projects = need(&state.projects, stage, Stage::Projects)?;
            let (batch, types) = stages::generate_field_types(config, projects)?;
            script.id_ranges.insert(stage.table(), types.global_range());
            state.field_types = Some(types);
            batch
        }
        Stage::TaskFields => {
            let projects = need(&state.projects, stage, Stage::Projects)?;
            let types = need(&state.field_types, stage, Stage::TaskFieldTypes)?;
            let (batch, fields) = stages::generate_fields(config, projects, types)?;
            script.id_ranges.insert(stage.table(), fields.global_range());
            state.fields = Some(fields);
            batch
        }
        Stage::TaskFieldOptions => {
            let fields = need(&state.fields, stage, Stage::TaskFields)?;
            stages::generate_field_options(config, fields)
        }
        Stage::Tasks => {
            let projects = need(&state.projects, stage, Stage::Projects)?;
            let (batch, tasks) = stages::generate_tasks(config, stream, projects)?;
            script.id_ranges.insert(stage.table(), tasks.global_range());
            state.tasks = Some(tasks);
            batch
        }
        Stage::TaskFieldValues => {
            let tasks = need(&state.tasks, stage, Stage::Tasks)?;
            let fields = need(&state.fields, stage, Stage::TaskFields)?;
            let members = need(&state.members, stage, Stage::ProjectMembers)?;
            stages::generate_field_values(config, stream, tasks, fields, members)
        }
        Stage::TaskConnections => {
            let tasks = need(&state.tasks, stage, Stage::Tasks)?;
            stages::generate_connections(config, stream, tasks)
        }
        Stage::TaskAssignees => {
            let tasks = need(&state.tasks, stage, Stage::Tasks)?;
            let members = need(&state.members, stage, Stage::ProjectMembers)?;
            stages::generate_assignees(config, stream, tasks, members)
        }
    };
    Ok(batch)
}
