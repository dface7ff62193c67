pub mod aggregator;
pub mod assembler;
pub mod builder;
pub mod matcher;
pub mod timespec;

pub use aggregator::FetchPolicy;
pub use assembler::PlaylistPolicy;
pub use builder::*;
pub use timespec::*;
