pub mod engine;
pub mod field;
pub mod gate;
pub mod ids;
pub mod stages;
pub mod value;

use std::fmt;

/// One step of the generation pipeline, responsible for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Users,
    Projects,
    ProjectMembers,
    TaskFieldTypes,
    TaskFields,
    TaskFieldOptions,
    Tasks,
    TaskFieldValues,
    TaskConnections,
    TaskAssignees,
}

impl Stage {
    /// Table the stage fills.
    pub fn table(self) -> &'static str {
        match self {
            Stage::Users => "app_user",
            Stage::Projects => "project",
            Stage::ProjectMembers => "project_member",
            Stage::TaskFieldTypes => "task_field_type",
            Stage::TaskFields => "task_field",
            Stage::TaskFieldOptions => "task_field_option",
            Stage::Tasks => "task",
            Stage::TaskFieldValues => "task_fields_for_task",
            Stage::TaskConnections => "task_connection",
            Stage::TaskAssignees => "task_assignee",
        }
    }

    /// Columns the stage emits, in VALUES order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Stage::Users => &["email", "name", "photo_url"],
            Stage::Projects => &["name", "photo_url", "icon", "owner", "next_task_id"],
            Stage::ProjectMembers => &["project_id", "user_id", "is_pinned", "last_visited"],
            Stage::TaskFieldTypes => &["name", "project_id"],
            Stage::TaskFields => &["project_id", "task_field_type_id", "name"],
            Stage::TaskFieldOptions => &["task_field", "value"],
            Stage::Tasks => &[
                "project_id",
                "parent_id",
                "display_id",
                "icon",
                "senku_row",
                "senku_column",
            ],
            Stage::TaskFieldValues => &["task_id", "task_field_id", "value"],
            Stage::TaskConnections => &["target_task", "unblocked_task"],
            Stage::TaskAssignees => &["task_id", "user_id"],
        }
    }

    /// Stages whose rows or state this stage reads. Self references
    /// (`task.parent_id`) are resolved inside the stage and not listed.
    pub fn depends_on(self) -> &'static [Stage] {
        match self {
            Stage::Users => &[],
            Stage::Projects => &[Stage::Users],
            Stage::ProjectMembers => &[Stage::Projects, Stage::Users],
            Stage::TaskFieldTypes => &[Stage::Projects],
            Stage::TaskFields => &[Stage::Projects, Stage::TaskFieldTypes],
            Stage::TaskFieldOptions => &[Stage::TaskFields],
            Stage::Tasks => &[Stage::Projects],
            Stage::TaskFieldValues => &[Stage::Tasks, Stage::TaskFields, Stage::ProjectMembers],
            Stage::TaskConnections => &[Stage::Tasks],
            Stage::TaskAssignees => &[Stage::Tasks, Stage::ProjectMembers],
        }
    }

    /// The order the pipeline runs its stages in.
    pub fn pipeline(assignee_table: bool) -> Vec<Stage> {
        let mut stages = vec![
            Stage::Users,
            Stage::Projects,
            Stage::ProjectMembers,
            Stage::TaskFieldTypes,
            Stage::TaskFields,
            Stage::TaskFieldOptions,
            Stage::Tasks,
            Stage::TaskFieldValues,
            Stage::TaskConnections,
        ];
        if assignee_table {
            stages.push(Stage::TaskAssignees);
        }
        stages
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}
