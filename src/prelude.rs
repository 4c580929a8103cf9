pub use crate::builder::{CollisionPolicy, Table, TableBuilder};
pub use crate::cache::mru::MruCache;
pub use crate::ds::{NodeArena, NodeId, RecencyList};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::hash::{AlphaSumHasher, FxSeedHasher, KeyHasher, ReseedableHasher};
pub use crate::table::chained::ChainedTable;
pub use crate::table::cuckoo::CuckooTable;
pub use crate::table::open_addressing::{GrowthPolicy, OpenAddressingTable};
pub use crate::table::Entry;
pub use crate::traits::{CoreTable, ResizableTable};

#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, TableMetricsSnapshot};
