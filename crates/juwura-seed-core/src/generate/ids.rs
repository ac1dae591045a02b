//! # Identifier Allocator
//!
//! Serial ids of project-scoped tables are partitioned into one contiguous
//! block per project: the `i`-th row of project `p` always gets
//! `i + 1 + p * per_project`. The allocator is the only place that formula
//! lives. Stages call `assign` while emitting rows and later stages resolve
//! references through `id_of` / `range`, so a reference can only point at a
//! block that has been filled.

use std::ops::RangeInclusive;

use crate::error::{Result, SeedError};

/// Per-table id allocator with one block per project.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    table: &'static str,
    per_project: usize,
    /// Next free index within each project's block.
    next: Vec<usize>,
}

impl IdAllocator {
    /// Allocator for a project-scoped table.
    pub fn new(table: &'static str, projects: usize, per_project: usize) -> Self {
        Self {
            table,
            per_project,
            next: vec![0; projects],
        }
    }

    /// Allocator for a table that is not project-scoped (a single block).
    pub fn flat(table: &'static str, rows: usize) -> Self {
        Self::new(table, 1, rows)
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn projects(&self) -> usize {
        self.next.len()
    }

    pub fn per_project(&self) -> usize {
        self.per_project
    }

    /// Assign the next id inside `project`'s block.
    pub fn assign(&mut self, project: usize) -> Result<i64> {
        let capacity = self.per_project;
        let exhausted = || SeedError::IdExhausted {
            table: self.table.to_string(),
            project,
            capacity,
        };
        let slot = self.next.get(project).copied().ok_or_else(exhausted)?;
        if slot >= capacity {
            return Err(exhausted());
        }
        self.next[project] = slot + 1;
        Ok(self.id_of(project, slot))
    }

    /// Global id of the `index`-th row of `project`.
    pub fn id_of(&self, project: usize, index: usize) -> i64 {
        (index + 1 + project * self.per_project) as i64
    }

    /// Ids reserved for `project`, whether assigned yet or not.
    pub fn range(&self, project: usize) -> RangeInclusive<i64> {
        self.id_of(project, 0)..=(((project + 1) * self.per_project) as i64)
    }

    /// Ids assigned so far in `project`.
    pub fn assigned(&self, project: usize) -> usize {
        self.next.get(project).copied().unwrap_or(0)
    }

    /// Total ids assigned across all projects.
    pub fn total(&self) -> usize {
        self.next.iter().sum()
    }

    /// Every id the table can hold, `1..=projects * per_project`.
    pub fn global_range(&self) -> RangeInclusive<i64> {
        1..=((self.projects() * self.per_project) as i64)
    }

    /// Project owning a global id, if the id is inside the table's range.
    pub fn project_of(&self, id: i64) -> Option<usize> {
        if self.per_project == 0 || !self.global_range().contains(&id) {
            return None;
        }
        Some((id as usize - 1) / self.per_project)
    }
}
