pub mod dag;
pub mod topo;
pub mod visualize;
