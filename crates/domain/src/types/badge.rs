//! Classification labels attached to files.

use serde::{Deserialize, Serialize};

use crate::constants::BADGE_SENSITIVE_NAME;

/// Badge tier. A file with no badge is the `none` tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Risk,
    Attention,
    Cleanup,
    Stale,
}

impl BadgeKind {
    /// Ordering weight used by ranking: risk > attention > cleanup/stale.
    pub fn severity(self) -> u8 {
        match self {
            BadgeKind::Risk => 3,
            BadgeKind::Attention => 2,
            BadgeKind::Cleanup | BadgeKind::Stale => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    pub text: String,
}

impl Badge {
    pub fn new(kind: BadgeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn risk(text: impl Into<String>) -> Self {
        Self::new(BadgeKind::Risk, text)
    }

    pub fn attention(text: impl Into<String>) -> Self {
        Self::new(BadgeKind::Attention, text)
    }

    /// Attention badge raised by the sensitive-name rule.
    pub fn is_sensitive(&self) -> bool {
        self.kind == BadgeKind::Attention && self.text == BADGE_SENSITIVE_NAME
    }
}

/// Coarse sharing-risk bucket used by the shared-files filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Risk,
    Attention,
    Sensitive,
    NoRisk,
}

impl RiskLevel {
    pub fn of(badges: &[Badge]) -> Self {
        if badges.iter().any(|b| b.kind == BadgeKind::Risk) {
            RiskLevel::Risk
        } else if badges.iter().any(Badge::is_sensitive) {
            RiskLevel::Sensitive
        } else if badges.iter().any(|b| b.kind == BadgeKind::Attention) {
            RiskLevel::Attention
        } else {
            RiskLevel::NoRisk
        }
    }
}
