//! Synchronization primitives for async services.

pub mod keyed_lock;

pub use keyed_lock::KeyedLock;
