//! Caller-facing query parameters and provider-facing query descriptions.
//!
//! The filter parameters are orthogonal: type, size range, time range, sort
//! mode, risk level and sharing direction compose as a conjunction, and an
//! empty set always means "no filter".

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::activity::ActionKind;
use super::badge::RiskLevel;
use super::file::FileKind;
use crate::constants::DEFAULT_RESULT_LIMIT;
use crate::errors::DocPulseError;

/* -------------------------------------------------------------------------- */
/* Time range */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "4w")]
    LastFourWeeks,
    #[serde(rename = "1y")]
    LastYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn duration(self) -> Option<Duration> {
        match self {
            TimeRange::LastHour => Some(Duration::hours(1)),
            TimeRange::LastDay => Some(Duration::hours(24)),
            TimeRange::LastWeek => Some(Duration::days(7)),
            TimeRange::LastFourWeeks => Some(Duration::weeks(4)),
            TimeRange::LastYear => Some(Duration::days(365)),
            TimeRange::All => None,
        }
    }

    /// Earliest instant included when evaluated at `as_of`.
    pub fn lower_bound(self, as_of: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|window| as_of - window)
    }

    pub fn contains(self, at: DateTime<Utc>, as_of: DateTime<Utc>) -> bool {
        self.lower_bound(as_of).map_or(true, |lower| at >= lower)
    }
}

impl FromStr for TimeRange {
    type Err = DocPulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" | "hour" => Ok(TimeRange::LastHour),
            "24h" | "day" => Ok(TimeRange::LastDay),
            "7d" | "week" => Ok(TimeRange::LastWeek),
            "4w" | "30d" | "month" => Ok(TimeRange::LastFourWeeks),
            "1y" | "year" => Ok(TimeRange::LastYear),
            "all" => Ok(TimeRange::All),
            other => Err(DocPulseError::InvalidInput(format!("unknown time range: {other}"))),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Size range */
/* -------------------------------------------------------------------------- */

const GIB: u64 = 1024 * 1024 * 1024;

/// Storage-view size bands. Several may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeRange {
    #[serde(rename = "0.5-1")]
    HalfToOneGb,
    #[serde(rename = "1-5")]
    OneToFiveGb,
    #[serde(rename = "5-10")]
    FiveToTenGb,
    #[serde(rename = "10+")]
    OverTenGb,
}

impl SizeRange {
    /// Inclusive lower and exclusive upper bound in bytes.
    pub fn bounds(self) -> (u64, Option<u64>) {
        match self {
            SizeRange::HalfToOneGb => (GIB / 2, Some(GIB)),
            SizeRange::OneToFiveGb => (GIB, Some(5 * GIB)),
            SizeRange::FiveToTenGb => (5 * GIB, Some(10 * GIB)),
            SizeRange::OverTenGb => (10 * GIB, None),
        }
    }

    pub fn contains(self, bytes: u64) -> bool {
        let (lower, upper) = self.bounds();
        bytes >= lower && upper.map_or(true, |upper| bytes < upper)
    }
}

impl FromStr for SizeRange {
    type Err = DocPulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0.5-1" => Ok(SizeRange::HalfToOneGb),
            "1-5" => Ok(SizeRange::OneToFiveGb),
            "5-10" => Ok(SizeRange::FiveToTenGb),
            "10+" => Ok(SizeRange::OverTenGb),
            other => Err(DocPulseError::InvalidInput(format!("unknown size range: {other}"))),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Sort, view, direction, type label */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    SizeDesc,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Recent,
    Trending,
    Storage,
    Shared,
    Stale,
}

impl View {
    /// Inventory views list what the caller owns rather than what happened
    /// recently, and get the cleanup/stale badges.
    pub fn is_inventory(self) -> bool {
        matches!(self, View::Storage | View::Stale)
    }
}

impl FromStr for View {
    type Err = DocPulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(View::Recent),
            "trending" => Ok(View::Trending),
            "storage" => Ok(View::Storage),
            "shared" => Ok(View::Shared),
            "stale" => Ok(View::Stale),
            other => Err(DocPulseError::InvalidInput(format!("unknown view: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareDirection {
    /// Owned by the caller and shared with others.
    ByMe,
    /// Owned by someone else and shared with the caller.
    WithMe,
}

/// Coarse file type used by the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileTypeLabel {
    #[serde(rename = "PDF")]
    Pdf,
    Image,
    Folder,
    Doc,
    Sheet,
    Presentation,
    Video,
    Audio,
    Archive,
    File,
}

impl FileTypeLabel {
    pub fn classify(kind: FileKind, mime_type: &str) -> Self {
        if kind == FileKind::Folder {
            return FileTypeLabel::Folder;
        }
        Self::from_mime(mime_type)
    }

    /// Office Open XML types carry `officedocument` in every variant, so
    /// spreadsheet and presentation are checked before document.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|needle| mime.contains(needle));

        if has(&["pdf"]) {
            FileTypeLabel::Pdf
        } else if has(&["image"]) {
            FileTypeLabel::Image
        } else if has(&["folder"]) {
            FileTypeLabel::Folder
        } else if has(&["spreadsheet", "sheet", "excel", "csv"]) {
            FileTypeLabel::Sheet
        } else if has(&["presentation", "powerpoint", "slides"]) {
            FileTypeLabel::Presentation
        } else if has(&["document", "word"]) {
            FileTypeLabel::Doc
        } else if has(&["video"]) {
            FileTypeLabel::Video
        } else if has(&["audio"]) {
            FileTypeLabel::Audio
        } else if has(&["zip", "compressed", "x-tar", "vnd.rar"]) {
            FileTypeLabel::Archive
        } else {
            FileTypeLabel::File
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Caller query and result window */
/* -------------------------------------------------------------------------- */

/// Everything a UI surface can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuery {
    pub view: View,
    pub limit: usize,
    pub time_range: TimeRange,
    pub size_ranges: BTreeSet<SizeRange>,
    pub types: BTreeSet<FileTypeLabel>,
    pub sort: SortMode,
    pub risk_levels: BTreeSet<RiskLevel>,
    pub directions: BTreeSet<ShareDirection>,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            view: View::Recent,
            limit: DEFAULT_RESULT_LIMIT,
            time_range: TimeRange::All,
            size_ranges: BTreeSet::new(),
            types: BTreeSet::new(),
            sort: SortMode::SizeDesc,
            risk_levels: BTreeSet::new(),
            directions: BTreeSet::new(),
        }
    }
}

impl FileQuery {
    pub fn new(view: View) -> Self {
        Self { view, ..Self::default() }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.time_range = range;
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_type(mut self, label: FileTypeLabel) -> Self {
        self.types.insert(label);
        self
    }

    pub fn with_size_range(mut self, range: SizeRange) -> Self {
        self.size_ranges.insert(range);
        self
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_levels.insert(level);
        self
    }

    pub fn with_direction(mut self, direction: ShareDirection) -> Self {
        self.directions.insert(direction);
        self
    }
}

/// First-N window over an already sorted and filtered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches before windowing.
    pub total: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new(), total: 0, has_more: false }
    }
}

/* -------------------------------------------------------------------------- */
/* Provider-facing queries */
/* -------------------------------------------------------------------------- */

/// Event-log query: lower time bound plus an action filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub since: DateTime<Utc>,
    /// Empty means every action kind.
    pub actions: Vec<ActionKind>,
    pub page_size: u32,
    pub max_results: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListingOrder {
    #[default]
    RecentlyViewed,
    LargestFirst,
    OldestViewedFirst,
}

/// Listing query: ANDed predicates, an order and a result cap. Size
/// thresholds are applied after the fact by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub viewed_after: Option<DateTime<Utc>>,
    pub owned_by_me: Option<bool>,
    pub shared: Option<ShareDirection>,
    pub include_folders: bool,
    /// Parent folder IDs to exclude.
    pub excluded_parents: Vec<String>,
    pub order: ListingOrder,
    pub page_size: u32,
    pub max_results: usize,
}
