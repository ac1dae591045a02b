use crate::graph::dag::StageGraph;
use petgraph::visit::EdgeRef;

/// Output format for graph visualization.
pub enum GraphFormat {
    Mermaid,
    Dot,
}

/// Generate a visualization of the stage dependency graph.
pub fn visualize(graph: &StageGraph, format: GraphFormat) -> String {
    match format {
        GraphFormat::Mermaid => generate_mermaid(graph),
        GraphFormat::Dot => generate_dot(graph),
    }
}

fn generate_mermaid(graph: &StageGraph) -> String {
    let mut output = String::from("graph TD\n");

    for node in graph.graph.node_indices() {
        let name = graph.stage(node).table();
        output.push_str(&format!("    {}[{}]\n", name, name));
    }

    output.push('\n');

    for edge in graph.graph.edge_references() {
        let from = graph.stage(edge.source()).table();
        let to = graph.stage(edge.target()).table();
        output.push_str(&format!("    {} --> {}\n", from, to));
    }

    output
}

fn generate_dot(graph: &StageGraph) -> String {
    let mut output = String::from("digraph stages {\n");
    output.push_str("    rankdir=TB;\n");
    output.push_str("    node [shape=box, style=rounded];\n\n");

    for edge in graph.graph.edge_references() {
        let from = graph.stage(edge.source()).table();
        let to = graph.stage(edge.target()).table();
        output.push_str(&format!("    \"{}\" -> \"{}\";\n", from, to));
    }

    output.push_str("}\n");
    output
}
