use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::generate::Stage;

/// A directed graph of pipeline stages.
/// Edges point from dependent stage to the stage it reads (child → parent).
pub struct StageGraph {
    pub graph: DiGraph<Stage, ()>,
    pub node_indices: HashMap<Stage, NodeIndex>,
}

impl StageGraph {
    /// Build the graph for a set of stages.
    /// Dependencies on stages outside the set are left out.
    pub fn from_stages(stages: &[Stage]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for &stage in stages {
            node_indices
                .entry(stage)
                .or_insert_with(|| graph.add_node(stage));
        }

        for &stage in stages {
            for dep in stage.depends_on() {
                if let (Some(&from_idx), Some(&to_idx)) =
                    (node_indices.get(&stage), node_indices.get(dep))
                {
                    graph.update_edge(from_idx, to_idx, ());
                }
            }
        }

        Self {
            graph,
            node_indices,
        }
    }

    /// Get the stage for a node index.
    pub fn stage(&self, idx: NodeIndex) -> Stage {
        self.graph[idx]
    }

    /// Get node index for a stage.
    pub fn node_index(&self, stage: Stage) -> Option<NodeIndex> {
        self.node_indices.get(&stage).copied()
    }

    pub fn stage_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
