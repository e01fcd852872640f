pub mod pathfinder;
pub mod universe_graph;

pub use pathfinder::*;
pub use universe_graph::*;
