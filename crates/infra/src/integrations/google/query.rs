//! Drive `q` expressions, order clauses and Activity filters.

use docpulse_domain::{ActionKind, ActivityQuery, ListingOrder, ListingQuery, ShareDirection};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Field mask for a single file resource.
pub const FILE_FIELDS: &str = "id,name,mimeType,size,modifiedTime,viewedByMeTime,sharedWithMeTime,\
parents,owners(displayName,emailAddress),permissions(type,role),shared,ownedByMe,webViewLink";

/// Field mask for `files.list`.
pub fn list_fields() -> String {
    format!("nextPageToken,files({FILE_FIELDS})")
}

/// Quote a literal for use inside a `q` expression.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Render the ANDed predicates of a listing query.
pub fn listing_q(query: &ListingQuery) -> String {
    let mut clauses = vec!["trashed = false".to_string()];

    match query.owned_by_me {
        Some(true) => clauses.push("'me' in owners".into()),
        Some(false) => clauses.push("not 'me' in owners".into()),
        None => {}
    }
    if query.shared == Some(ShareDirection::WithMe) {
        clauses.push("sharedWithMe = true".into());
    }
    if !query.include_folders {
        clauses.push(format!("mimeType != {}", quote(FOLDER_MIME)));
    }
    if let Some(after) = query.viewed_after {
        clauses.push(format!(
            "viewedByMeTime > {}",
            quote(&after.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        ));
    }
    for parent in &query.excluded_parents {
        clauses.push(format!("not {} in parents", quote(parent)));
    }

    clauses.join(" and ")
}

pub fn order_by(order: ListingOrder) -> &'static str {
    match order {
        ListingOrder::RecentlyViewed => "viewedByMeTime desc",
        ListingOrder::LargestFirst => "quotaBytesUsed desc",
        ListingOrder::OldestViewedFirst => "viewedByMeTime",
    }
}

/// Folders named exactly one of `names`.
pub fn folder_search_q(names: &[String]) -> String {
    let names = names.iter().map(|name| format!("name = {}", quote(name))).collect::<Vec<_>>();
    format!("mimeType = {} and trashed = false and ({})", quote(FOLDER_MIME), names.join(" or "))
}

/// Activity API filter: a time lower bound plus the action cases.
///
/// Views have no activity-log case and are dropped; a kind list that only
/// held views therefore queries every case.
pub fn activity_filter(query: &ActivityQuery) -> String {
    let since = query.since.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let mut filter = format!("time >= \"{since}\"");

    let mut cases: Vec<&str> = Vec::new();
    for case in query.actions.iter().filter_map(|kind| action_case(*kind)) {
        if !cases.contains(&case) {
            cases.push(case);
        }
    }
    if !cases.is_empty() {
        filter.push_str(&format!(" AND detail.action_detail_case:({})", cases.join(" ")));
    }
    filter
}

fn action_case(kind: ActionKind) -> Option<&'static str> {
    match kind {
        ActionKind::Created => Some("CREATE"),
        ActionKind::Edited => Some("EDIT"),
        ActionKind::Moved => Some("MOVE"),
        ActionKind::Renamed => Some("RENAME"),
        ActionKind::Deleted => Some("DELETE"),
        ActionKind::Restored => Some("RESTORE"),
        ActionKind::Commented => Some("COMMENT"),
        ActionKind::Shared | ActionKind::Unshared => Some("PERMISSION_CHANGE"),
        ActionKind::Viewed => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn quote_escapes_backslashes_and_apostrophes() {
        assert_eq!(quote("Bob's \\ files"), r"'Bob\'s \\ files'");
    }

    #[test]
    fn default_listing_excludes_trash_and_folders() {
        let q = listing_q(&ListingQuery::default());
        assert_eq!(q, format!("trashed = false and mimeType != '{FOLDER_MIME}'"));
    }

    #[test]
    fn listing_renders_every_predicate_in_order() {
        let query = ListingQuery {
            viewed_after: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()),
            owned_by_me: Some(false),
            shared: Some(ShareDirection::WithMe),
            include_folders: true,
            excluded_parents: vec!["fold-1".into(), "fold-2".into()],
            ..ListingQuery::default()
        };

        assert_eq!(
            listing_q(&query),
            "trashed = false and not 'me' in owners and sharedWithMe = true \
             and viewedByMeTime > '2024-05-01T08:30:00Z' \
             and not 'fold-1' in parents and not 'fold-2' in parents"
        );
    }

    #[test]
    fn folder_search_ors_names() {
        let q = folder_search_q(&["Archive".into(), "Tax '23".into()]);
        assert_eq!(
            q,
            format!(
                "mimeType = '{FOLDER_MIME}' and trashed = false and (name = 'Archive' or name = 'Tax \\'23')"
            )
        );
    }

    #[test]
    fn activity_filter_dedups_cases_and_skips_views() {
        let query = ActivityQuery {
            since: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            actions: vec![
                ActionKind::Edited,
                ActionKind::Shared,
                ActionKind::Viewed,
                ActionKind::Unshared,
                ActionKind::Renamed,
            ],
            page_size: 100,
            max_results: 100,
        };

        assert_eq!(
            activity_filter(&query),
            "time >= \"2024-06-01T00:00:00.000Z\" AND detail.action_detail_case:(EDIT PERMISSION_CHANGE RENAME)"
        );
    }

    #[test]
    fn activity_filter_without_actions_is_time_only() {
        let query = ActivityQuery {
            since: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            actions: Vec::new(),
            page_size: 100,
            max_results: 100,
        };
        assert_eq!(activity_filter(&query), "time >= \"2024-06-01T00:00:00.000Z\"");
    }
}
