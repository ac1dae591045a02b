use petgraph::algo::toposort;

use crate::error::{Result, SeedError};
use crate::generate::Stage;
use crate::graph::dag::StageGraph;

/// Check that every stage runs after all of its dependencies.
///
/// A dependency that is missing from `order` altogether is reported the same
/// way as one scheduled too late: the stage would read state nobody built.
pub fn verify_order(order: &[Stage]) -> Result<()> {
    for (pos, stage) in order.iter().enumerate() {
        for dep in stage.depends_on() {
            if !order[..pos].contains(dep) {
                return Err(SeedError::StageOrder {
                    stage: stage.to_string(),
                    dependency: dep.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Compute one valid insertion order for the stages in the graph
/// (parents before children).
pub fn topological_order(graph: &StageGraph) -> Result<Vec<Stage>> {
    // Edges go child → parent, so toposort yields children first.
    match toposort(&graph.graph, None) {
        Ok(sorted) => Ok(sorted.iter().rev().map(|&idx| graph.stage(idx)).collect()),
        Err(cycle) => {
            let stage = graph.stage(cycle.node_id());
            Err(SeedError::StageOrder {
                stage: stage.to_string(),
                dependency: stage.to_string(),
            })
        }
    }
}
