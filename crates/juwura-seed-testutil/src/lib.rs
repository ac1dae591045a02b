use std::sync::OnceLock;

use indexmap::IndexMap;
use juwura_seed_core::config::GeneratorConfig;
use regex::Regex;

/// The reference run: 8 users, 5 projects with 3 members and 10 tasks each.
pub fn scenario_config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.counts.users = 8;
    config.counts.projects = 5;
    config.counts.members_per_project = 3;
    config.counts.tasks_per_project = 10;
    config
}

/// Smallest config that still exercises every table.
pub fn tiny_config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.counts.users = 3;
    config.counts.projects = 2;
    config.counts.members_per_project = 2;
    config.counts.tasks_per_project = 3;
    config.counts.relations_per_project = 2;
    config
}

/// Set every gate probability in `config` to `p`.
pub fn with_all_probabilities(mut config: GeneratorConfig, p: f64) -> GeneratorConfig {
    config.probabilities.member_pinned_default = p;
    config.probabilities.task_parent_null = p;
    for field in &mut config.fields {
        field.null_probability = p;
    }
    config
}

/// One INSERT statement read back from a script.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub table: String,
    pub columns: Vec<String>,
    /// Raw SQL literals, one `Vec` per tuple.
    pub rows: Vec<Vec<String>>,
    /// The character that closed each tuple line (`,` or `;`).
    pub terminators: Vec<char>,
}

impl ParsedBatch {
    /// Raw literals of one column.
    pub fn column(&self, name: &str) -> Vec<&str> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .unwrap_or_else(|| panic!("no column {} in {}", name, self.table));
        self.rows.iter().map(|row| row[idx].as_str()).collect()
    }

    /// Integer values of one column; `NULL` and `DEFAULT` become `None`.
    pub fn column_ints(&self, name: &str) -> Vec<Option<i64>> {
        self.column(name).iter().map(|v| v.parse().ok()).collect()
    }

    /// Unquoted string values of one column; unquoted literals become `None`.
    pub fn column_strings(&self, name: &str) -> Vec<Option<String>> {
        self.column(name).iter().map(|v| unquote(v)).collect()
    }
}

/// A whole script read back into its directive and batches.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    pub database: String,
    pub batches: IndexMap<String, ParsedBatch>,
}

impl ParsedScript {
    pub fn batch(&self, table: &str) -> &ParsedBatch {
        self.batches
            .get(table)
            .unwrap_or_else(|| panic!("no batch for {}", table))
    }
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^INSERT INTO (\w+) \(([\w, ]+)\) VALUES$").unwrap())
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\((.*)\)([,;])$").unwrap())
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\\c (\w+)$").unwrap())
}

/// Parse an emitted script.
///
/// Strict about layout: the directive must come first, every statement's
/// tuples must continue with `,` and end with exactly one `;`, and each tuple
/// must have one literal per column.
pub fn parse_script(text: &str) -> Result<ParsedScript, String> {
    let mut lines = text.lines();
    let first = lines.next().ok_or("empty script")?;
    let database = directive_re()
        .captures(first)
        .ok_or_else(|| format!("expected directive, got {:?}", first))?[1]
        .to_string();

    let mut batches: IndexMap<String, ParsedBatch> = IndexMap::new();
    let mut current: Option<ParsedBatch> = None;

    for (n, line) in lines.enumerate() {
        let line_no = n + 2;
        if let Some(batch) = current.as_mut() {
            let caps = row_re()
                .captures(line)
                .ok_or_else(|| format!("line {}: expected tuple, got {:?}", line_no, line))?;
            let values = split_tuple(&caps[1]);
            if values.len() != batch.columns.len() {
                return Err(format!(
                    "line {}: {} values for {} columns",
                    line_no,
                    values.len(),
                    batch.columns.len()
                ));
            }
            let terminator = caps[2].chars().next().unwrap_or(',');
            batch.rows.push(values);
            batch.terminators.push(terminator);
            if terminator == ';' {
                let done = current.take().unwrap();
                if batches.contains_key(&done.table) {
                    return Err(format!("duplicate batch for {}", done.table));
                }
                batches.insert(done.table.clone(), done);
            }
        } else if line.is_empty() {
            continue;
        } else {
            let caps = header_re()
                .captures(line)
                .ok_or_else(|| format!("line {}: expected INSERT, got {:?}", line_no, line))?;
            current = Some(ParsedBatch {
                table: caps[1].to_string(),
                columns: caps[2].split(", ").map(str::to_string).collect(),
                rows: Vec::new(),
                terminators: Vec::new(),
            });
        }
    }

    if let Some(open) = current {
        return Err(format!("statement for {} never terminated", open.table));
    }

    Ok(ParsedScript { database, batches })
}

/// Split the inside of a tuple on top-level commas, leaving commas inside
/// quoted strings and parentheses alone.
fn split_tuple(inner: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut depth = 0usize;

    for c in inner.chars() {
        match c {
            '\'' => {
                // '' inside a string toggles twice and stays quoted
                in_quote = !in_quote;
                current.push(c);
            }
            '(' if !in_quote => {
                depth += 1;
                current.push(c);
            }
            ')' if !in_quote => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if !in_quote && depth == 0 => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    values.push(current.trim().to_string());
    values
}

/// The content of a single-quoted SQL string literal.
pub fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_quotes_and_parens() {
        let parts = split_tuple("1, 'a, b', NOW() + interval '3 day', '[\"x\", \"y\"]', NULL");
        assert_eq!(
            parts,
            [
                "1",
                "'a, b'",
                "NOW() + interval '3 day'",
                "'[\"x\", \"y\"]'",
                "NULL"
            ]
        );
    }

    #[test]
    fn test_unquote_doubles() {
        assert_eq!(unquote("'it''s'"), Some("it's".to_string()));
        assert_eq!(unquote("NULL"), None);
    }

    #[test]
    fn test_parse_minimal_script() {
        let text = "\\c juwura\nINSERT INTO task_connection (target_task, unblocked_task) VALUES\n(1, 2),\n(3, 1);\n\n";
        let script = parse_script(text).unwrap();
        assert_eq!(script.database, "juwura");
        let batch = script.batch("task_connection");
        assert_eq!(batch.column_ints("target_task"), [Some(1), Some(3)]);
        assert_eq!(batch.terminators, [',', ';']);
    }

    #[test]
    fn test_unterminated_statement_rejected() {
        let text = "\\c juwura\nINSERT INTO task_connection (target_task, unblocked_task) VALUES\n(1, 2),\n";
        assert!(parse_script(text).is_err());
    }

    #[test]
    fn test_fixtures_validate() {
        scenario_config().validate().unwrap();
        tiny_config().validate().unwrap();
        with_all_probabilities(tiny_config(), 1.0).validate().unwrap();
    }
}
