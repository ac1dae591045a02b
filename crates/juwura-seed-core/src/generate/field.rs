//! # Task Field Kinds
//!
//! The closed set of custom-field types and the value-shaping function of
//! each. Adding a kind means adding a variant here and one arm in `shape`.

use std::fmt;

use serde::Deserialize;

use crate::config::{CountConfig, FieldSpec};
use crate::generate::value::Value;
use crate::random::SeededStream;

/// Declared type of a task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKind {
    Text,
    Date,
    #[serde(alias = "SELECT")]
    Choice,
    Number,
    Assignee,
}

impl FieldKind {
    /// Every kind, in the reference type-id order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Text,
        FieldKind::Date,
        FieldKind::Choice,
        FieldKind::Number,
        FieldKind::Assignee,
    ];

    /// Name stored in `task_field_type.name`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Date => "DATE",
            FieldKind::Choice => "CHOICE",
            FieldKind::Number => "NUMBER",
            FieldKind::Assignee => "ASSIGNEE",
        }
    }

    /// Whether a field of this kind draws from its own `values` list.
    pub fn needs_values(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Choice)
    }

    /// Whether the field enumerates its legal values in `task_field_option`.
    pub fn has_options(self) -> bool {
        matches!(self, FieldKind::Choice)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream state a value needs besides the field itself.
pub struct ShapeContext<'a> {
    pub counts: &'a CountConfig,
    /// Emails of the members of the task's project.
    pub members: &'a [String],
}

/// Produce the concrete (ungated) value a task holds for `field`.
pub fn shape(field: &FieldSpec, ctx: &ShapeContext<'_>, stream: &mut SeededStream) -> Value {
    match field.kind {
        FieldKind::Text => Value::Text(stream.pick(&field.values).clone()),
        FieldKind::Date => {
            let days = stream.below(ctx.counts.due_date_span_days);
            Value::Expr(format!("NOW() + interval '{} day'", days))
        }
        FieldKind::Choice => Value::Text(stream.pick(&field.values).clone()),
        FieldKind::Number => Value::Int(stream.below(ctx.counts.sprint_max) as i64 + 1),
        FieldKind::Assignee => {
            let max = ctx.counts.max_assignees.min(ctx.members.len());
            let len = 1 + stream.below(max);
            let picks: Vec<serde_json::Value> = stream
                .permutation(ctx.members.len())
                .into_iter()
                .take(len)
                .map(|i| serde_json::Value::String(ctx.members[i].clone()))
                .collect();
            Value::Json(serde_json::Value::Array(picks))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<String> {
        vec![
            "correo1@gmail.com".to_string(),
            "correo4@gmail.com".to_string(),
            "correo7@gmail.com".to_string(),
        ]
    }

    #[test]
    fn test_kind_names_round_trip_through_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            kinds: Vec<FieldKind>,
        }
        let parsed: Wrapper =
            toml::from_str(r#"kinds = ["TEXT", "DATE", "CHOICE", "SELECT", "NUMBER", "ASSIGNEE"]"#)
                .unwrap();
        let names: Vec<&str> = parsed.kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["TEXT", "DATE", "CHOICE", "CHOICE", "NUMBER", "ASSIGNEE"]);
    }

    #[test]
    fn test_date_stays_within_span() {
        let counts = CountConfig::default();
        let members = members();
        let ctx = ShapeContext { counts: &counts, members: &members };
        let field = FieldSpec::new("Due Date", FieldKind::Date, &[]);
        let mut s = SeededStream::new(1);
        for _ in 0..200 {
            let Value::Expr(expr) = shape(&field, &ctx, &mut s) else {
                panic!("DATE must shape to an expression");
            };
            let days: usize = expr
                .trim_start_matches("NOW() + interval '")
                .trim_end_matches(" day'")
                .parse()
                .unwrap();
            assert!(days < counts.due_date_span_days);
        }
    }

    #[test]
    fn test_number_is_one_based() {
        let counts = CountConfig::default();
        let members = members();
        let ctx = ShapeContext { counts: &counts, members: &members };
        let field = FieldSpec::new("Sprint", FieldKind::Number, &[]);
        let mut s = SeededStream::new(2);
        for _ in 0..200 {
            let n = shape(&field, &ctx, &mut s).as_int().unwrap();
            assert!((1..=counts.sprint_max as i64).contains(&n));
        }
    }

    #[test]
    fn test_choice_draws_from_options() {
        let counts = CountConfig::default();
        let members = members();
        let ctx = ShapeContext { counts: &counts, members: &members };
        let field = FieldSpec::new("Status", FieldKind::Choice, &["TODO", "DOING", "DONE"]);
        let mut s = SeededStream::new(3);
        for _ in 0..100 {
            let v = shape(&field, &ctx, &mut s);
            assert!(field.values.iter().any(|o| Some(o.as_str()) == v.as_text()));
        }
    }

    #[test]
    fn test_assignee_lists_distinct_project_members() {
        let counts = CountConfig {
            max_assignees: 3,
            ..CountConfig::default()
        };
        let members = members();
        let ctx = ShapeContext { counts: &counts, members: &members };
        let field = FieldSpec::new("Assignees", FieldKind::Assignee, &[]);
        let mut s = SeededStream::new(4);
        for _ in 0..100 {
            let Value::Json(serde_json::Value::Array(list)) = shape(&field, &ctx, &mut s) else {
                panic!("ASSIGNEE must shape to a JSON list");
            };
            assert!(!list.is_empty() && list.len() <= 3);
            let mut emails: Vec<&str> = list.iter().filter_map(|v| v.as_str()).collect();
            assert!(emails.iter().all(|e| members.iter().any(|m| m == e)));
            emails.sort_unstable();
            emails.dedup();
            assert_eq!(emails.len(), list.len(), "assignees must be distinct");
        }
    }
}
