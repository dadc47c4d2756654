//! Aggregate insights over sampled files.

pub mod duplicates;
pub mod summary;

pub use duplicates::find_duplicates;
pub use summary::summarize;
