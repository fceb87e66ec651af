mod spawn_nodes;

pub use spawn_nodes::SpawnNodes;
