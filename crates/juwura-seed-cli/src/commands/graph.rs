use anyhow::Result;

use juwura_seed_core::generate::Stage;
use juwura_seed_core::graph::dag::StageGraph;
use juwura_seed_core::graph::topo::{topological_order, verify_order};
use juwura_seed_core::graph::visualize::{self, GraphFormat as VizFormat};

use crate::args::GraphArgs;

pub fn run(args: &GraphArgs) -> Result<()> {
    let stages = Stage::pipeline(args.assignee_table);
    verify_order(&stages)?;
    let graph = StageGraph::from_stages(&stages);

    let format = match args.format {
        crate::args::GraphFormat::Mermaid => VizFormat::Mermaid,
        crate::args::GraphFormat::Dot => VizFormat::Dot,
    };

    let output = visualize::visualize(&graph, format);
    println!("{}", output);

    let order: Vec<String> = topological_order(&graph)?
        .iter()
        .map(|s| s.to_string())
        .collect();
    eprintln!("Insertion order: {}", order.join(" → "));

    Ok(())
}
