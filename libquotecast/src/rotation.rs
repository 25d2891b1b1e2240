//! Quote rotation: pick an unused quote and keep the usage history bounded
//!
//! Selection rules:
//! 1. Candidates are catalog quotes not present in the history.
//! 2. When every quote is in the history, the history shrinks to its last
//!    `RESET_BUFFER` entries and candidates are recomputed, so the quotes
//!    posted most recently still stay out of the next pick.
//! 3. One candidate is chosen uniformly at random, appended to the history,
//!    and the history is cut back to `HISTORY_LIMIT`.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::history::{HistoryStore, UsageHistory, HISTORY_LIMIT};
use crate::types::{ContentKind, Poll};

/// History entries kept when the catalog has been exhausted
pub const RESET_BUFFER: usize = 10;

/// Posted when the catalog has no quotes at all
pub const FALLBACK_QUOTE: &str = "Stay motivated and keep pushing forward! 💪 #Motivation #Success";

/// Result of a quote selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub quote: String,
    pub history: UsageHistory,
    /// The catalog was exhausted and the history was shrunk to pick this quote
    pub reset: bool,
    /// Empty catalog: `quote` is the fallback and `history` is unchanged
    pub fallback: bool,
    /// Why the updated history could not be saved, if it was not
    pub save_error: Option<String>,
}

/// Pick a quote from `catalog` avoiding everything in `history`
pub fn select_quote<R: Rng + ?Sized>(
    catalog: &[String],
    history: &UsageHistory,
    rng: &mut R,
) -> Selection {
    if catalog.is_empty() {
        warn!("Quote catalog is empty, using fallback message");
        return Selection {
            quote: FALLBACK_QUOTE.to_string(),
            history: history.clone(),
            reset: false,
            fallback: true,
            save_error: None,
        };
    }

    let mut history = history.clone();
    let mut available = unused_quotes(catalog, &history);
    let mut reset = false;

    if available.is_empty() {
        history.truncate_to(RESET_BUFFER);
        available = unused_quotes(catalog, &history);
        reset = true;
        info!(
            history_len = history.len(),
            available = available.len(),
            "All quotes used recently, resetting rotation"
        );
    }

    // Only reachable when every catalog quote sits in the reset buffer,
    // i.e. the catalog holds RESET_BUFFER quotes or fewer.
    if available.is_empty() {
        available = catalog.iter().map(String::as_str).collect();
    }

    let quote = available
        .choose(rng)
        .map(|q| q.to_string())
        .unwrap_or_else(|| FALLBACK_QUOTE.to_string());

    debug!(
        available = available.len(),
        history_len = history.len(),
        "Selected quote"
    );

    history.record(quote.clone());
    debug_assert!(history.len() <= HISTORY_LIMIT);

    Selection {
        quote,
        history,
        reset,
        fallback: false,
        save_error: None,
    }
}

/// Catalog quotes not present in `history`, in catalog order
pub fn unused_quotes<'a>(catalog: &'a [String], history: &UsageHistory) -> Vec<&'a str> {
    catalog
        .iter()
        .filter(|quote| !history.contains(quote))
        .map(String::as_str)
        .collect()
}

/// Single Bernoulli draw: poll with `poll_probability`, quote otherwise
pub fn decide_content_type<R: Rng + ?Sized>(poll_probability: f64, rng: &mut R) -> ContentKind {
    let p = if poll_probability.is_nan() {
        0.0
    } else {
        poll_probability.clamp(0.0, 1.0)
    };

    if rng.gen_bool(p) {
        ContentKind::Poll
    } else {
        ContentKind::Quote
    }
}

/// Uniformly random poll from the catalog
pub fn choose_poll<'a, R: Rng + ?Sized>(polls: &'a [Poll], rng: &mut R) -> Option<&'a Poll> {
    polls.choose(rng)
}

/// Couples the pure selection with a persisted history
pub struct RotationSelector<S: HistoryStore> {
    store: S,
}

impl<S: HistoryStore> RotationSelector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load history, select, and persist the updated history immediately
    ///
    /// The history is saved before anything is published, so a quote counts
    /// as used even if posting it fails later. With `persist` false (dry
    /// runs) nothing is written. A failed save is logged and recorded in
    /// `Selection::save_error`; the selected quote is still returned.
    pub fn next_quote<R: Rng + ?Sized>(
        &self,
        catalog: &[String],
        rng: &mut R,
        persist: bool,
    ) -> Selection {
        let history = self.store.load();
        let mut selection = select_quote(catalog, &history, rng);

        if persist && !selection.fallback {
            if let Err(e) = self.store.save(&selection.history) {
                error!(error = %e, "Failed to save usage history, continuing");
                selection.save_error = Some(e.to_string());
            }
        }

        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn history(items: &[&str]) -> UsageHistory {
        UsageHistory::from_entries(catalog(items))
    }

    #[test]
    fn test_picks_the_only_unused_quote() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let selection = select_quote(&catalog(&["A", "B"]), &history(&["A"]), &mut rng);
            assert_eq!(selection.quote, "B");
            assert!(!selection.reset);
            assert_eq!(selection.history.entries(), &["A".to_string(), "B".to_string()]);
        }
    }

    #[test]
    fn test_exhausted_two_item_catalog_resets_and_picks_either() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_a = false;
        let mut seen_b = false;

        for _ in 0..200 {
            let selection = select_quote(&catalog(&["A", "B"]), &history(&["A", "B"]), &mut rng);
            assert!(selection.reset);
            match selection.quote.as_str() {
                "A" => seen_a = true,
                "B" => seen_b = true,
                other => panic!("unexpected quote {}", other),
            }
        }

        assert!(seen_a && seen_b, "both quotes should be reachable after reset");
    }

    #[test]
    fn test_empty_catalog_returns_fallback_without_touching_history() {
        let mut rng = StdRng::seed_from_u64(3);
        let before = history(&["X", "Y"]);
        let selection = select_quote(&[], &before, &mut rng);

        assert_eq!(selection.quote, FALLBACK_QUOTE);
        assert!(selection.fallback);
        assert_eq!(selection.history, before);
    }

    #[test]
    fn test_never_returns_a_quote_from_history() {
        let quotes: Vec<String> = (0..30).map(|i| format!("quote {}", i)).collect();
        let mut rng = StdRng::seed_from_u64(42);

        for used in 0..quotes.len() {
            let past = UsageHistory::from_entries(quotes[..used].to_vec());
            let selection = select_quote(&quotes, &past, &mut rng);
            assert!(!past.contains(&selection.quote));
            assert!(!selection.reset);
        }
    }

    #[test]
    fn test_history_never_exceeds_limit() {
        let quotes: Vec<String> = (0..120).map(|i| format!("quote {}", i)).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let mut past = UsageHistory::new();

        for _ in 0..300 {
            let selection = select_quote(&quotes, &past, &mut rng);
            assert!(selection.history.len() <= HISTORY_LIMIT);
            past = selection.history;
        }
    }

    #[test]
    fn test_reset_leaves_candidates_for_catalogs_over_buffer_size() {
        let quotes: Vec<String> = (0..12).map(|i| format!("quote {}", i)).collect();
        let full = UsageHistory::from_entries(quotes.clone());
        let mut rng = StdRng::seed_from_u64(5);

        let selection = select_quote(&quotes, &full, &mut rng);
        assert!(selection.reset);

        // The ten most recent quotes stay blocked after the reset
        let recent = &quotes[quotes.len() - RESET_BUFFER..];
        assert!(!recent.contains(&selection.quote));
        assert_eq!(selection.history.len(), RESET_BUFFER + 1);
    }

    #[test]
    fn test_no_immediate_repeat_across_consecutive_runs() {
        let quotes = catalog(&["A", "B", "C"]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut past = UsageHistory::new();
        let mut previous: Option<String> = None;

        for _ in 0..100 {
            let selection = select_quote(&quotes, &past, &mut rng);
            if let Some(prev) = previous.as_ref() {
                if !selection.reset {
                    assert_ne!(prev, &selection.quote);
                }
            }
            previous = Some(selection.quote.clone());
            past = selection.history;
        }
    }

    #[test]
    fn test_unused_quotes_preserves_catalog_order() {
        let quotes = catalog(&["A", "B", "C", "D"]);
        let unused = unused_quotes(&quotes, &history(&["C", "A"]));
        assert_eq!(unused, vec!["B", "D"]);
    }

    #[test]
    fn test_decide_content_type_extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(decide_content_type(0.0, &mut rng), ContentKind::Quote);
            assert_eq!(decide_content_type(1.0, &mut rng), ContentKind::Poll);
            assert_eq!(decide_content_type(f64::NAN, &mut rng), ContentKind::Quote);
            assert_eq!(decide_content_type(3.0, &mut rng), ContentKind::Poll);
        }
    }

    #[test]
    fn test_decide_content_type_is_roughly_twenty_percent() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 10_000;
        let polls = (0..trials)
            .filter(|_| decide_content_type(0.2, &mut rng) == ContentKind::Poll)
            .count();

        let ratio = polls as f64 / trials as f64;
        assert!((0.17..0.23).contains(&ratio), "poll ratio was {}", ratio);
    }

    #[test]
    fn test_choose_poll_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(choose_poll(&[], &mut rng).is_none());
    }

    #[test]
    fn test_selector_persists_updated_history() {
        let store = MemoryStore::with_history(&["A"]);
        let selector = RotationSelector::new(store.clone());
        let mut rng = StdRng::seed_from_u64(8);

        let selection = selector
            .next_quote(&catalog(&["A", "B"]), &mut rng, true);

        assert_eq!(selection.quote, "B");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot().last(), Some("B"));
    }

    #[test]
    fn test_selector_dry_run_does_not_persist() {
        let store = MemoryStore::new();
        let selector = RotationSelector::new(store.clone());
        let mut rng = StdRng::seed_from_u64(8);

        selector
            .next_quote(&catalog(&["A", "B"]), &mut rng, false);

        assert_eq!(store.save_count(), 0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_selector_fallback_does_not_persist() {
        let store = MemoryStore::with_history(&["A"]);
        let selector = RotationSelector::new(store.clone());
        let mut rng = StdRng::seed_from_u64(8);

        let selection = selector.next_quote(&[], &mut rng, true);
        assert!(selection.fallback);
        assert_eq!(store.save_count(), 0);
    }

    struct UnwritableStore;

    impl HistoryStore for UnwritableStore {
        fn load(&self) -> UsageHistory {
            UsageHistory::new()
        }

        fn save(&self, _history: &UsageHistory) -> crate::error::Result<()> {
            Err(crate::error::StoreError::Io {
                path: "/readonly/used_quotes.json".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }
            .into())
        }
    }

    #[test]
    fn test_selector_save_failure_still_selects() {
        let selector = RotationSelector::new(UnwritableStore);
        let mut rng = StdRng::seed_from_u64(8);

        let selection = selector.next_quote(&catalog(&["A", "B"]), &mut rng, true);

        assert!(["A", "B"].contains(&selection.quote.as_str()));
        let error = selection.save_error.expect("save failure is reported");
        assert!(error.contains("/readonly/used_quotes.json"));
    }
}
