//! # Table Generators
//!
//! One function per stage. Each takes the shared stream, the read-only state
//! of the stages it depends on and the configuration, and returns the
//! table's batch together with the state later stages need. Project-scoped
//! ids always come from an `IdAllocator`; no stage computes an id by hand.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generate::field::{shape, ShapeContext};
use crate::generate::gate::{default_or, null_or};
use crate::generate::ids::IdAllocator;
use crate::generate::value::Value;
use crate::generate::Stage;
use crate::random::SeededStream;

/// All rows of one table, emitted as one batch statement.
#[derive(Debug, Clone)]
pub struct TableBatch {
    pub stage: Stage,
    pub rows: Vec<Vec<Value>>,
}

impl TableBatch {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            rows: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static str {
        self.stage.table()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.stage.columns()
    }

    pub fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns().len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column across all rows.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns().iter().position(|c| *c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// Users and the email surrogate key every other table references them by.
#[derive(Debug, Clone)]
pub struct Users {
    pub ids: IdAllocator,
    pub emails: Vec<String>,
}

/// Members of each project, indexed by project index.
#[derive(Debug, Clone)]
pub struct Members {
    pub by_project: Vec<Vec<String>>,
}

/// Value of `project_id` for project index `p`.
fn project_id(projects: &IdAllocator, p: usize) -> Value {
    Value::Int(projects.id_of(0, p))
}

pub fn generate_users(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
) -> Result<(TableBatch, Users)> {
    let count = config.counts.users;
    let mut ids = IdAllocator::flat(Stage::Users.table(), count);
    let mut emails = Vec::with_capacity(count);
    let mut batch = TableBatch::new(Stage::Users);

    for _ in 0..count {
        let id = ids.assign(0)?;
        let email = format!("correo{}@{}", id, config.schema.email_domain);
        let name = stream.pick(&config.pools.names).clone();
        let photo = stream.pick(&config.pools.profile_pictures).clone();
        batch.push(vec![
            Value::Text(email.clone()),
            Value::Text(name),
            Value::Text(photo),
        ]);
        emails.push(email);
    }

    debug!("Generated {} users", batch.len());
    Ok((batch, Users { ids, emails }))
}

pub fn generate_projects(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    users: &Users,
) -> Result<(TableBatch, IdAllocator)> {
    let count = config.counts.projects;
    let mut projects = IdAllocator::flat(Stage::Projects.table(), count);
    let mut batch = TableBatch::new(Stage::Projects);

    for _ in 0..count {
        projects.assign(0)?;
        let name = format!(
            "{}{}",
            config.schema.project_name_prefix,
            stream.pick(&config.pools.names)
        );
        let banner = stream.pick(&config.pools.project_banners).clone();
        let icon = stream.pick(&config.pools.emojis).clone();
        let owner = stream.pick(&users.emails).clone();
        batch.push(vec![
            Value::Text(name),
            Value::Text(banner),
            Value::Text(icon),
            Value::Text(owner),
            Value::Default,
        ]);
    }

    debug!("Generated {} projects", batch.len());
    Ok((batch, projects))
}

/// Each project gets the first `members_per_project` users of a fresh
/// permutation, so members of one project are always distinct.
pub fn generate_members(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    users: &Users,
    projects: &IdAllocator,
) -> (TableBatch, Members) {
    let mut batch = TableBatch::new(Stage::ProjectMembers);
    let mut by_project = Vec::with_capacity(projects.total());

    for p in 0..projects.total() {
        let order = stream.permutation(users.emails.len());
        let mut members = Vec::with_capacity(config.counts.members_per_project);
        for &user_idx in order.iter().take(config.counts.members_per_project) {
            let email = users.emails[user_idx].clone();
            let pinned = default_or(
                stream,
                config.probabilities.member_pinned_default,
                Value::Bool(true),
            );
            batch.push(vec![
                project_id(projects, p),
                Value::Text(email.clone()),
                pinned,
                Value::Expr("NOW()".to_string()),
            ]);
            members.push(email);
        }
        by_project.push(members);
    }

    debug!("Generated {} project members", batch.len());
    (batch, Members { by_project })
}

pub fn generate_field_types(
    config: &GeneratorConfig,
    projects: &IdAllocator,
) -> Result<(TableBatch, IdAllocator)> {
    let mut types = IdAllocator::new(
        Stage::TaskFieldTypes.table(),
        projects.total(),
        config.field_types.len(),
    );
    let mut batch = TableBatch::new(Stage::TaskFieldTypes);

    for p in 0..projects.total() {
        for kind in &config.field_types {
            types.assign(p)?;
            batch.push(vec![
                Value::Text(kind.as_str().to_string()),
                project_id(projects, p),
            ]);
        }
    }

    Ok((batch, types))
}

/// The field layout of every project. A field's type id is looked up in the
/// same project's type block.
pub fn generate_fields(
    config: &GeneratorConfig,
    projects: &IdAllocator,
    types: &IdAllocator,
) -> Result<(TableBatch, IdAllocator)> {
    let mut fields = IdAllocator::new(
        Stage::TaskFields.table(),
        projects.total(),
        config.fields.len(),
    );
    let mut batch = TableBatch::new(Stage::TaskFields);

    for p in 0..projects.total() {
        for field in &config.fields {
            fields.assign(p)?;
            // validate() guarantees every field kind is in field_types
            let type_idx = config.field_type_index(field.kind).unwrap_or_default();
            batch.push(vec![
                project_id(projects, p),
                Value::Int(types.id_of(p, type_idx)),
                Value::Text(field.name.clone()),
            ]);
        }
    }

    Ok((batch, fields))
}

/// Legal values of every CHOICE field, each under that field's own id.
pub fn generate_field_options(config: &GeneratorConfig, fields: &IdAllocator) -> TableBatch {
    let mut batch = TableBatch::new(Stage::TaskFieldOptions);

    for p in 0..fields.projects() {
        for (idx, field) in config.fields.iter().enumerate() {
            if !field.kind.has_options() {
                continue;
            }
            for option in &field.values {
                batch.push(vec![
                    Value::Int(fields.id_of(p, idx)),
                    Value::Text(option.clone()),
                ]);
            }
        }
    }

    batch
}

/// Tasks of every project. A task's parent, when present, is one of the
/// tasks already emitted for the same project.
pub fn generate_tasks(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    projects: &IdAllocator,
) -> Result<(TableBatch, IdAllocator)> {
    let per_project = config.counts.tasks_per_project;
    let mut tasks = IdAllocator::new(Stage::Tasks.table(), projects.total(), per_project);
    let mut batch = TableBatch::new(Stage::Tasks);

    for p in 0..projects.total() {
        for i in 0..per_project {
            tasks.assign(p)?;
            let parent = if i == 0 {
                Value::Null
            } else {
                let candidate = tasks.id_of(p, stream.below(i));
                null_or(
                    stream,
                    config.probabilities.task_parent_null,
                    Value::Int(candidate),
                )
            };
            let icon = stream.pick(&config.pools.emojis).clone();
            batch.push(vec![
                project_id(projects, p),
                parent,
                Value::Text(format!("T-{}", i + 1)),
                Value::Text(icon),
                Value::Default,
                Value::Default,
            ]);
        }
    }

    debug!("Generated {} tasks", batch.len());
    Ok((batch, tasks))
}

/// One value per task per field of the task's project, shaped by the
/// field's kind and then NULL-gated with the field's probability.
pub fn generate_field_values(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    tasks: &IdAllocator,
    fields: &IdAllocator,
    members: &Members,
) -> TableBatch {
    let mut batch = TableBatch::new(Stage::TaskFieldValues);

    for p in 0..tasks.projects() {
        let ctx = ShapeContext {
            counts: &config.counts,
            members: &members.by_project[p],
        };
        for t in 0..tasks.assigned(p) {
            let task_id = tasks.id_of(p, t);
            for (idx, field) in config.fields.iter().enumerate() {
                let value = shape(field, &ctx, stream);
                let value = null_or(stream, field.null_probability, value);
                batch.push(vec![
                    Value::Int(task_id),
                    Value::Int(fields.id_of(p, idx)),
                    value,
                ]);
            }
        }
    }

    debug!("Generated {} task field values", batch.len());
    batch
}

/// Directed pairs of distinct tasks of the same project. The second
/// endpoint is drawn from the other `n - 1` tasks so no retry is needed.
pub fn generate_connections(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    tasks: &IdAllocator,
) -> TableBatch {
    let mut batch = TableBatch::new(Stage::TaskConnections);

    for p in 0..tasks.projects() {
        let n = tasks.assigned(p);
        if n < 2 {
            continue;
        }
        for _ in 0..config.counts.relations_per_project {
            let target = stream.below(n);
            let mut unblocked = stream.below(n - 1);
            if unblocked >= target {
                unblocked += 1;
            }
            batch.push(vec![
                Value::Int(tasks.id_of(p, target)),
                Value::Int(tasks.id_of(p, unblocked)),
            ]);
        }
    }

    batch
}

/// Assignee rows of the `task_assignee` schema variant: per task, between
/// zero and `assignees_per_task_max` distinct members of its project.
pub fn generate_assignees(
    config: &GeneratorConfig,
    stream: &mut SeededStream,
    tasks: &IdAllocator,
    members: &Members,
) -> TableBatch {
    let mut batch = TableBatch::new(Stage::TaskAssignees);

    for p in 0..tasks.projects() {
        let project_members = &members.by_project[p];
        let max = config
            .counts
            .assignees_per_task_max
            .min(project_members.len());
        for t in 0..tasks.assigned(p) {
            let task_id = tasks.id_of(p, t);
            let count = stream.below(max + 1);
            if count == 0 {
                continue;
            }
            for m in stream.permutation(project_members.len()).into_iter().take(count) {
                batch.push(vec![
                    Value::Int(task_id),
                    Value::Text(project_members[m].clone()),
                ]);
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::field::FieldKind;

    fn config() -> GeneratorConfig {
        GeneratorConfig::default()
    }

    #[test]
    fn test_users_have_sequential_emails() {
        let mut s = SeededStream::new(42);
        let (batch, users) = generate_users(&config(), &mut s).unwrap();
        assert_eq!(batch.len(), 8);
        assert_eq!(users.emails[0], "correo1@gmail.com");
        assert_eq!(users.emails[7], "correo8@gmail.com");
        assert_eq!(users.ids.global_range(), 1..=8);
    }

    #[test]
    fn test_project_owner_is_a_user() {
        let cfg = config();
        let mut s = SeededStream::new(42);
        let (_, users) = generate_users(&cfg, &mut s).unwrap();
        let (batch, projects) = generate_projects(&cfg, &mut s, &users).unwrap();
        assert_eq!(projects.total(), 5);
        for owner in batch.column("owner").unwrap() {
            let email = owner.as_text().unwrap();
            assert!(users.emails.iter().any(|e| e == email));
        }
        for name in batch.column("name").unwrap() {
            assert!(name.as_text().unwrap().starts_with("Proyecto "));
        }
    }

    #[test]
    fn test_members_are_distinct_per_project() {
        let cfg = config();
        let mut s = SeededStream::new(7);
        let (_, users) = generate_users(&cfg, &mut s).unwrap();
        let (_, projects) = generate_projects(&cfg, &mut s, &users).unwrap();
        let (batch, members) = generate_members(&cfg, &mut s, &users, &projects);
        assert_eq!(batch.len(), 15);
        for list in &members.by_project {
            let mut sorted = list.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 3);
        }
        for pinned in batch.column("is_pinned").unwrap() {
            assert!(matches!(pinned, Value::Default | Value::Bool(true)));
        }
    }

    #[test]
    fn test_field_type_ids_resolve_within_project() {
        let cfg = config();
        let mut projects = IdAllocator::flat("project", 5);
        for _ in 0..5 {
            projects.assign(0).unwrap();
        }
        let (type_batch, types) = generate_field_types(&cfg, &projects).unwrap();
        assert_eq!(type_batch.len(), 25);
        let (field_batch, fields) = generate_fields(&cfg, &projects, &types).unwrap();
        assert_eq!(field_batch.len(), 35);
        assert_eq!(fields.total(), 35);

        for row in &field_batch.rows {
            let project = row[0].as_int().unwrap() as usize - 1;
            let type_id = row[1].as_int().unwrap();
            assert!(types.range(project).contains(&type_id));
        }
        // Project 3's "Status" field (CHOICE, type index 2) -> type id 2 + 1 + 3 * 5.
        let status = &field_batch.rows[3 * 7 + 2];
        assert_eq!(status[1], Value::Int(18));
        assert_eq!(status[2], Value::Text("Status".into()));
    }

    #[test]
    fn test_options_reference_their_own_choice_field() {
        let cfg = config();
        let mut fields = IdAllocator::new("task_field", 2, cfg.fields.len());
        for p in 0..2 {
            for _ in 0..cfg.fields.len() {
                fields.assign(p).unwrap();
            }
        }
        let batch = generate_field_options(&cfg, &fields);
        assert_eq!(batch.len(), 12);
        // Status is field index 2, Priority index 3.
        assert_eq!(batch.rows[0], vec![Value::Int(3), Value::Text("TODO".into())]);
        assert_eq!(batch.rows[3], vec![Value::Int(4), Value::Text("HIGH".into())]);
        assert_eq!(batch.rows[6], vec![Value::Int(10), Value::Text("TODO".into())]);
        for row in &batch.rows {
            let idx = (row[0].as_int().unwrap() as usize - 1) % cfg.fields.len();
            assert_eq!(cfg.fields[idx].kind, FieldKind::Choice);
        }
    }

    #[test]
    fn test_task_parents_point_backwards_within_project() {
        let cfg = config();
        let mut s = SeededStream::new(99);
        let mut projects = IdAllocator::flat("project", 5);
        for _ in 0..5 {
            projects.assign(0).unwrap();
        }
        let (batch, tasks) = generate_tasks(&cfg, &mut s, &projects).unwrap();
        assert_eq!(batch.len(), 50);
        for (row_idx, row) in batch.rows.iter().enumerate() {
            let p = row_idx / 10;
            let own_id = tasks.id_of(p, row_idx % 10);
            match &row[1] {
                Value::Null => {}
                Value::Int(parent) => {
                    assert!(tasks.range(p).contains(parent));
                    assert!(*parent < own_id, "parent {} of {} is not earlier", parent, own_id);
                }
                other => panic!("unexpected parent {:?}", other),
            }
            if row_idx % 10 == 0 {
                assert_eq!(row[1], Value::Null);
            }
        }
    }

    #[test]
    fn test_connections_are_distinct_siblings() {
        let mut cfg = config();
        cfg.counts.relations_per_project = 50;
        cfg.counts.tasks_per_project = 2;
        let mut s = SeededStream::new(5);
        let mut tasks = IdAllocator::new("task", 3, 2);
        for p in 0..3 {
            tasks.assign(p).unwrap();
            tasks.assign(p).unwrap();
        }
        let batch = generate_connections(&cfg, &mut s, &tasks);
        assert_eq!(batch.len(), 150);
        for row in &batch.rows {
            let a = row[0].as_int().unwrap();
            let b = row[1].as_int().unwrap();
            assert_ne!(a, b);
            assert_eq!(tasks.project_of(a), tasks.project_of(b));
        }
    }

    #[test]
    fn test_assignees_are_project_members() {
        let cfg = config();
        let mut s = SeededStream::new(12);
        let mut tasks = IdAllocator::new("task", 2, 10);
        for p in 0..2 {
            for _ in 0..10 {
                tasks.assign(p).unwrap();
            }
        }
        let members = Members {
            by_project: vec![
                vec!["correo1@gmail.com".into(), "correo2@gmail.com".into()],
                vec!["correo3@gmail.com".into()],
            ],
        };
        let batch = generate_assignees(&cfg, &mut s, &tasks, &members);
        for row in &batch.rows {
            let task = row[0].as_int().unwrap();
            let p = tasks.project_of(task).unwrap();
            let email = row[1].as_text().unwrap();
            assert!(members.by_project[p].iter().any(|m| m == email));
        }
        let mut pairs: Vec<_> = batch
            .rows
            .iter()
            .map(|r| (r[0].as_int().unwrap(), r[1].as_text().unwrap().to_string()))
            .collect();
        let before = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(before, pairs.len(), "assignee rows must not repeat");
    }
}
