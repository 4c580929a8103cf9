pub mod node_arena;
pub mod recency_list;

pub use node_arena::{NodeArena, NodeId};
pub use recency_list::RecencyList;
