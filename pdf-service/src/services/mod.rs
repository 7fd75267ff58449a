pub mod locks;
pub mod metrics;
pub mod pdf;
pub mod storage;

pub use locks::DocumentLocks;
pub use metrics::{get_metrics, init_metrics};
pub use storage::{LocalStorage, MemoryStorage, Storage};
