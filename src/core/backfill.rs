//! Candidate backfill.
//!
//! The eligibility filters can be arbitrarily restrictive, so the pool handed
//! to scoring is topped up with the most recently created entities until it
//! reaches the target size.

use crate::services::store::FetchQuery;

/// Plan the backfill fetch for a primary result of `primary_ids`
///
/// Returns `None` when the primary fetch already reached `target`. With
/// `exclude_primary` set, the primary ids are excluded from the backfill so
/// no candidate appears twice. `always_exclude` holds ids never wanted in the
/// pool at all (the subject itself for user matching).
pub fn plan(
    primary_ids: &[i64],
    target: usize,
    exclude_primary: bool,
    always_exclude: &[i64],
) -> Option<FetchQuery> {
    let shortfall = target.saturating_sub(primary_ids.len());
    if shortfall == 0 {
        return None;
    }

    let mut query = FetchQuery::latest(shortfall).exclude(always_exclude.iter().copied());
    if exclude_primary {
        query = query.exclude(primary_ids.iter().copied());
    }

    Some(query)
}

/// Append the backfilled candidates after the primary ones, capped at `target`
pub fn merge<T>(mut primary: Vec<T>, backfill: Vec<T>, target: usize) -> Vec<T> {
    let room = target.saturating_sub(primary.len());
    primary.extend(backfill.into_iter().take(room));
    primary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_backfill_when_pool_full() {
        let ids: Vec<i64> = (1..=10).collect();

        assert!(plan(&ids, 10, true, &[]).is_none());
        assert!(plan(&ids[..], 8, true, &[]).is_none());
    }

    #[test]
    fn test_backfill_fetches_shortfall() {
        let query = plan(&[4, 9, 2], 10, true, &[]).unwrap();

        assert_eq!(query.limit, 7);
        assert!(query.predicate.is_match_all());
        assert_eq!(query.exclude_ids, vec![4, 9, 2]);
    }

    #[test]
    fn test_backfill_without_dedup_keeps_always_excluded() {
        let query = plan(&[4], 10, false, &[1]).unwrap();

        assert_eq!(query.limit, 9);
        assert_eq!(query.exclude_ids, vec![1]);
    }

    #[test]
    fn test_empty_primary_fetches_full_pool() {
        let query = plan(&[], 10, true, &[]).unwrap();
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_merge_preserves_order_and_caps() {
        let merged = merge(vec![1, 2], vec![7, 8, 9], 4);
        assert_eq!(merged, vec![1, 2, 7, 8]);

        let merged = merge(vec![1, 2], vec![], 4);
        assert_eq!(merged, vec![1, 2]);
    }
}
