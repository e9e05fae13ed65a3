use chrono::{TimeZone, Utc};
use compressx_core::{Ledger, LedgerError, StatisticsSummary};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn sizes() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(
        (0.01f64..500.0, 0.0f64..1.0).prop_map(|(orig, frac)| (orig, orig * frac)),
        1..40,
    )
}

fn build(entries: &[(f64, f64)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (i, (orig, comp)) in entries.iter().enumerate() {
        let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap();
        ledger.record(*orig, *comp, format!("file{i}.pdf"), ts).unwrap();
    }
    ledger
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn aggregates_match_records(entries in sizes()) {
        let ledger = build(&entries);
        let summary = ledger.summary();

        let expected_saved: f64 = entries.iter().map(|(o, c)| o - c).sum();
        let expected_avg: f64 = entries
            .iter()
            .map(|(o, c)| (1.0 - c / o) * 100.0)
            .sum::<f64>()
            / entries.len() as f64;

        prop_assert_eq!(summary.count, entries.len());
        prop_assert!(close(summary.total_space_saved, expected_saved));
        prop_assert!(close(summary.average_compression, expected_avg));
    }

    #[test]
    fn summary_is_idempotent(entries in sizes()) {
        let ledger = build(&entries);
        prop_assert_eq!(ledger.summary(), ledger.summary());
    }

    #[test]
    fn deleting_in_any_order_reaches_zero(
        entries in sizes(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 40),
    ) {
        let mut ledger = build(&entries);
        let mut picks = picks.into_iter();
        while !ledger.is_empty() {
            let index = picks
                .next()
                .map(|p| p.index(ledger.len()))
                .unwrap_or(0);
            ledger.remove_at(index).unwrap();
        }
        prop_assert_eq!(ledger.summary(), StatisticsSummary::default());
    }

    #[test]
    fn removal_matches_fresh_ledger(entries in sizes(), pick in any::<prop::sample::Index>()) {
        let mut ledger = build(&entries);
        let index = pick.index(entries.len());
        ledger.remove_at(index).unwrap();

        let mut remaining = entries.clone();
        remaining.remove(index);
        let fresh = build(&remaining).summary();
        let summary = ledger.summary();

        prop_assert_eq!(summary.count, fresh.count);
        prop_assert!(close(summary.total_space_saved, fresh.total_space_saved));
        prop_assert!(close(summary.average_compression, fresh.average_compression));
    }

    #[test]
    fn out_of_range_leaves_ledger_unchanged(entries in sizes(), extra in 0usize..10) {
        let mut ledger = build(&entries);
        let before = ledger.summary();
        let index = entries.len() + extra;

        prop_assert_eq!(
            ledger.remove_at(index),
            Err(LedgerError::IndexOutOfRange { index, len: entries.len() })
        );
        prop_assert_eq!(ledger.summary(), before);
        prop_assert_eq!(ledger.len(), entries.len());
    }
}

#[test]
fn zero_original_size_is_rejected() {
    let mut ledger = Ledger::new();
    let err = ledger.record(0.0, 0.0, "empty.png", Utc::now()).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidSize { .. }));
    assert_eq!(ledger.summary(), StatisticsSummary::default());
    assert!(ledger.is_empty());
}

#[test]
fn repeated_insert_delete_does_not_drift() {
    let mut ledger = Ledger::new();
    ledger.record(10.0, 6.0, "anchor.png", Utc::now()).unwrap();
    for i in 0..10_000 {
        let orig = 0.1 + (i % 97) as f64 * 0.37;
        ledger.record(orig, orig * 0.3, "tmp.pdf", Utc::now()).unwrap();
        ledger.remove_at(1).unwrap();
    }

    let summary = ledger.summary();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.total_space_saved, 4.0);
    assert_eq!(summary.average_compression, ledger.records()[0].saved_percent);
}
