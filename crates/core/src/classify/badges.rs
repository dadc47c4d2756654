//! Badge classifier
//!
//! Pure function of a file's permissions, name, sharing state and last
//! activity. Rules are checked in tier order and the first match per tier
//! wins; any risk badge suppresses the attention tier.

use chrono::{DateTime, Utc};
use docpulse_domain::constants::{
    BADGE_PUBLIC_EDIT, BADGE_PUBLIC_VIEW, BADGE_SENSITIVE_NAME, BADGE_SHARED_EXTERNALLY,
};
use docpulse_domain::{Badge, BadgeKind, ClassifierConfig, FileRecord, PrincipalType};

use super::keywords::KeywordSet;

/// Per-call inputs that are not part of the file itself.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext {
    /// Reference instant for inactivity checks.
    pub as_of: DateTime<Utc>,
    /// Inventory views also get the cleanup and stale tiers.
    pub inventory: bool,
    /// Latest known activity; defaults to the file's last access.
    pub last_activity: Option<DateTime<Utc>>,
}

impl ClassifyContext {
    pub fn activity(as_of: DateTime<Utc>) -> Self {
        Self { as_of, inventory: false, last_activity: None }
    }

    pub fn inventory(as_of: DateTime<Utc>) -> Self {
        Self { as_of, inventory: true, last_activity: None }
    }

    pub fn with_last_activity(mut self, at: DateTime<Utc>) -> Self {
        self.last_activity = Some(at);
        self
    }
}

#[derive(Debug, Clone)]
pub struct BadgeClassifier {
    config: ClassifierConfig,
    keywords: KeywordSet,
}

impl Default for BadgeClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl BadgeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let keywords = KeywordSet::with_extra(&config.extra_sensitive_keywords);
        Self { config, keywords }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, file: &FileRecord, ctx: &ClassifyContext) -> Vec<Badge> {
        let mut badges = Vec::new();

        match self.risk(file) {
            Some(badge) => badges.push(badge),
            None => badges.extend(self.attention(file)),
        }

        if ctx.inventory {
            badges.extend(self.inactivity(file, ctx));
        }

        badges
    }

    pub fn is_sensitive_name(&self, name: &str) -> bool {
        self.keywords.matches(name)
    }

    pub fn is_large(&self, file: &FileRecord) -> bool {
        file.size_bytes.is_some_and(|bytes| bytes > self.config.large_file_bytes)
    }

    /// Not accessed within the stale threshold. Folders are never stale.
    pub fn is_stale(&self, file: &FileRecord, as_of: DateTime<Utc>) -> bool {
        !file.is_folder() && as_of - file.last_accessed_at() > self.config.stale_threshold()
    }

    fn risk(&self, file: &FileRecord) -> Option<Badge> {
        let mut public = file
            .permissions
            .iter()
            .filter(|permission| permission.principal_type == PrincipalType::Anyone)
            .peekable();

        public.peek()?;
        if public.any(|permission| permission.role.can_edit()) {
            Some(Badge::risk(BADGE_PUBLIC_EDIT))
        } else {
            Some(Badge::risk(BADGE_PUBLIC_VIEW))
        }
    }

    fn attention(&self, file: &FileRecord) -> Option<Badge> {
        if self.is_sensitive_name(&file.name) {
            Some(Badge::attention(BADGE_SENSITIVE_NAME))
        } else if file.owned_by_me && file.shared {
            Some(Badge::attention(BADGE_SHARED_EXTERNALLY))
        } else {
            None
        }
    }

    fn inactivity(&self, file: &FileRecord, ctx: &ClassifyContext) -> Option<Badge> {
        if file.is_folder() {
            return None;
        }
        let last = ctx.last_activity.unwrap_or_else(|| file.last_accessed_at());
        let idle = ctx.as_of - last;

        if self.is_large(file) && idle > self.config.cleanup_threshold() {
            Some(Badge::new(BadgeKind::Cleanup, self.config.cleanup_badge_text()))
        } else if idle > self.config.stale_threshold() {
            Some(Badge::new(BadgeKind::Stale, self.config.stale_badge_text()))
        } else {
            None
        }
    }
}
