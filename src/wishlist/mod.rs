//! Locally persisted wishlist.

mod storage;
mod store;

pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use store::{WishlistStore, WISHLIST_KEY};
