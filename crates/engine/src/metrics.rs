//! Risk metric computer — aggregate and projection queries over register entries.
//!
//! Every operation is a pure function of its input. Filtering and sorting
//! return borrowed projections; the entries themselves are never modified.

use std::cmp::Reverse;

use riskview_common::error::AppError;
use riskview_common::types::{AssetSelector, Money, RiskEntry};

/// Stateless collection of the register queries used by the dashboard.
pub struct RiskMetricComputer;

impl RiskMetricComputer {
    /// Sum of annual loss expectancy. Zero for no entries.
    ///
    /// Fails with `Overflow` when an entry's loss or the running total does
    /// not fit in `Money`; a validated register never does.
    pub fn total_loss_expectancy<'a, I>(entries: I) -> Result<Money, AppError>
    where
        I: IntoIterator<Item = &'a RiskEntry>,
    {
        entries.into_iter().try_fold(Money::ZERO, |total, entry| {
            entry
                .checked_annual_loss_expectancy()
                .and_then(|ale| total.checked_add(ale))
                .ok_or_else(|| {
                    AppError::Overflow(format!(
                        "total annual loss expectancy exceeds the representable range at {}",
                        entry.title()
                    ))
                })
        })
    }

    /// Entry with the largest annual loss expectancy; the first one wins a tie.
    pub fn max_loss_entry<'a, I>(entries: I) -> Result<&'a RiskEntry, AppError>
    where
        I: IntoIterator<Item = &'a RiskEntry>,
    {
        let mut iter = entries.into_iter();
        let first = iter.next().ok_or_else(|| {
            AppError::EmptyInput("cannot take the maximum loss of zero entries".to_string())
        })?;

        // `Iterator::max_by_key` keeps the last maximum, so fold explicitly.
        let (best, _) = iter.fold(
            (first, first.annual_loss_expectancy()),
            |(best, best_ale), entry| {
                let ale = entry.annual_loss_expectancy();
                if ale > best_ale {
                    (entry, ale)
                } else {
                    (best, best_ale)
                }
            },
        );
        Ok(best)
    }

    /// Entries matching the selector, in input order.
    pub fn filter_by_asset<'a, I>(entries: I, selector: &AssetSelector) -> Vec<&'a RiskEntry>
    where
        I: IntoIterator<Item = &'a RiskEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| selector.matches(entry))
            .collect()
    }

    /// Entries ordered by annual loss expectancy, highest first. Stable on ties.
    pub fn sort_by_loss_descending<'a, I>(entries: I) -> Vec<&'a RiskEntry>
    where
        I: IntoIterator<Item = &'a RiskEntry>,
    {
        let mut sorted: Vec<&RiskEntry> = entries.into_iter().collect();
        sorted.sort_by_cached_key(|entry| Reverse(entry.annual_loss_expectancy()));
        sorted
    }

    pub fn entry_count<'a, I>(entries: I) -> usize
    where
        I: IntoIterator<Item = &'a RiskEntry>,
    {
        entries.into_iter().count()
    }
}

#[cfg(test)]
mod tests {
    use riskview_common::types::{AnnualRate, ExposureFactor};

    use super::*;

    fn entry(asset: &str, vulnerability: &str, base: u64, rate: u32) -> RiskEntry {
        RiskEntry {
            asset: asset.to_string(),
            vulnerability: vulnerability.to_string(),
            asset_value: 3,
            exposure_factor: ExposureFactor::from_basis_points(10_000),
            base_value: Money::from_major(base),
            annual_rate: AnnualRate::from_whole(rate),
            aro_label: "Annually".to_string(),
            justification: String::new(),
        }
    }

    #[test]
    fn test_total_empty_is_zero() {
        let entries: Vec<RiskEntry> = vec![];
        assert_eq!(
            RiskMetricComputer::total_loss_expectancy(&entries).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn test_total_sums_each_entry_once() {
        let entries = vec![entry("A", "x", 100, 1), entry("B", "y", 250, 2)];
        assert_eq!(
            RiskMetricComputer::total_loss_expectancy(&entries).unwrap(),
            Money::from_major(600)
        );
    }

    #[test]
    fn test_total_overflow_is_error_not_clamped() {
        // £1e17 at rate 1 fits on its own; two of them do not
        let mut huge = entry("A", "x", 0, 1);
        huge.base_value = Money::from_minor(10_000_000_000_000_000_000);
        assert_eq!(
            RiskMetricComputer::total_loss_expectancy([&huge]).unwrap(),
            huge.base_value
        );
        assert!(matches!(
            RiskMetricComputer::total_loss_expectancy([&huge, &huge]),
            Err(AppError::Overflow(_))
        ));

        // A single entry whose own loss does not fit
        huge.annual_rate = AnnualRate::from_whole(2);
        assert!(matches!(
            RiskMetricComputer::total_loss_expectancy([&huge]),
            Err(AppError::Overflow(_))
        ));
    }

    #[test]
    fn test_max_empty_is_error() {
        let entries: Vec<RiskEntry> = vec![];
        assert!(matches!(
            RiskMetricComputer::max_loss_entry(&entries),
            Err(AppError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_max_unique() {
        let entries = vec![
            entry("A", "x", 100, 1),
            entry("B", "y", 900, 1),
            entry("C", "z", 300, 1),
        ];
        let max = RiskMetricComputer::max_loss_entry(&entries).unwrap();
        assert_eq!(max.vulnerability, "y");
    }

    #[test]
    fn test_max_tie_prefers_first() {
        let entries = vec![
            entry("A", "x", 100, 1),
            entry("B", "first", 500, 1),
            entry("C", "second", 250, 2),
        ];
        let max = RiskMetricComputer::max_loss_entry(&entries).unwrap();
        assert_eq!(max.vulnerability, "first");
    }

    #[test]
    fn test_filter_all_is_identity() {
        let entries = vec![entry("A", "x", 1, 1), entry("B", "y", 2, 1)];
        let filtered = RiskMetricComputer::filter_by_asset(&entries, &AssetSelector::All);
        assert_eq!(filtered, entries.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_exact_match_preserves_order() {
        let entries = vec![
            entry("A", "x", 1, 1),
            entry("B", "y", 2, 1),
            entry("A", "z", 3, 1),
        ];
        let filtered = RiskMetricComputer::filter_by_asset(&entries, &AssetSelector::from("A"));
        let names: Vec<&str> = filtered.iter().map(|e| e.vulnerability.as_str()).collect();
        assert_eq!(names, vec!["x", "z"]);
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let entries = vec![entry("A", "x", 1, 1)];
        assert!(
            RiskMetricComputer::filter_by_asset(&entries, &AssetSelector::from("Nonexistent"))
                .is_empty()
        );
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let entries = vec![
            entry("A", "low", 10, 1),
            entry("B", "tie-1", 50, 1),
            entry("C", "high", 90, 1),
            entry("D", "tie-2", 25, 2),
        ];
        let sorted = RiskMetricComputer::sort_by_loss_descending(&entries);
        let names: Vec<&str> = sorted.iter().map(|e| e.vulnerability.as_str()).collect();
        assert_eq!(names, vec!["high", "tie-1", "tie-2", "low"]);
    }

    #[test]
    fn test_sort_empty() {
        let entries: Vec<RiskEntry> = vec![];
        assert!(RiskMetricComputer::sort_by_loss_descending(&entries).is_empty());
    }

    #[test]
    fn test_entry_count() {
        let entries = vec![entry("A", "x", 1, 1), entry("B", "y", 2, 1)];
        assert_eq!(RiskMetricComputer::entry_count(&entries), 2);
        let filtered = RiskMetricComputer::filter_by_asset(&entries, &AssetSelector::from("B"));
        assert_eq!(RiskMetricComputer::entry_count(filtered), 1);
    }
}
