//! File badge classification

pub mod badges;
pub mod keywords;

pub use badges::{BadgeClassifier, ClassifyContext};
pub use keywords::{KeywordSet, SENSITIVE_KEYWORDS};
