//! Disk-backed tile cache keyed by source URL.
//!
//! Entries live in a two-level sharded directory tree derived from a hash of
//! the URL. Entries are written once and never evicted.

mod disk;
mod path;
mod types;

pub use disk::DiskCache;
pub use path::{cache_file_name, cache_path, shard_directory};
pub use types::CacheError;
