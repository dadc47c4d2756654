//! Pairwise rank-and-buffer merge rule.

use std::cmp::Ordering;

use docpulse_domain::ActivityEvent;

/// Whether `candidate` should replace `held` as the chosen event for a file.
///
/// - A higher-rank candidate wins unless it is older than `held` by more
///   than the candidate's own buffer.
/// - A lower-rank candidate wins only when it is newer than `held` by more
///   than the held event's buffer, so a view landing minutes after an edit
///   never demotes the edit.
/// - Between equal ranks the strictly newer event wins; identical instants
///   fall back to [`docpulse_domain::ActionKind::tiebreak`].
///
/// The two unequal-rank branches are exact complements, so for any pair the
/// same event wins whichever one is held.
pub fn supersedes(candidate: &ActivityEvent, held: &ActivityEvent) -> bool {
    match candidate.rank().cmp(&held.rank()) {
        Ordering::Greater => candidate.occurred_at >= held.occurred_at - candidate.action.buffer(),
        Ordering::Less => candidate.occurred_at > held.occurred_at + held.action.buffer(),
        Ordering::Equal => match candidate.occurred_at.cmp(&held.occurred_at) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => candidate.action.tiebreak() > held.action.tiebreak(),
        },
    }
}

/// Pick the canonical event from a file's events.
///
/// Events are put into a canonical order before folding, which makes the
/// result independent of discovery order, including for three or more
/// events where pairwise decisions alone need not be transitive.
pub fn choose(events: &[ActivityEvent]) -> Option<&ActivityEvent> {
    let mut ordered: Vec<&ActivityEvent> = events.iter().collect();
    ordered.sort_by(|a, b| canonical_order(a, b));

    let mut iter = ordered.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |held, candidate| if supersedes(candidate, held) { candidate } else { held }))
}

fn canonical_order(a: &ActivityEvent, b: &ActivityEvent) -> Ordering {
    a.occurred_at
        .cmp(&b.occurred_at)
        .then_with(|| a.rank().cmp(&b.rank()))
        .then_with(|| a.action.tiebreak().cmp(&b.action.tiebreak()))
        .then_with(|| a.actor_id.cmp(&b.actor_id))
        .then_with(|| (a.source as u8).cmp(&(b.source as u8)))
}
