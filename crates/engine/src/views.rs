//! Dashboard views — the read-only projections the presentation layer renders.
//!
//! Headline metrics, the loss-by-asset bar chart, the risk-matrix bubble plot,
//! the sorted detail table and the filtered detail cards are all derived here
//! from a [`RiskRegister`]. Rendering itself happens elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;

use riskview_common::error::AppError;
use riskview_common::types::{AssetSelector, Money, RiskEntry};

use crate::metrics::RiskMetricComputer;
use crate::register::RiskRegister;

/// Bubble sizes are annual loss expectancy in millions of major units.
const BUBBLE_SIZE_DIVISOR: f64 = 1_000_000.0;

/// The three headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_loss_expectancy: Money,
    pub total_loss_display: String,
    /// `None` when the register is empty.
    pub highest_single_loss: Option<Money>,
    pub highest_single_loss_display: Option<String>,
    /// Title of the entry carrying the highest loss.
    pub highest_single_loss_title: Option<String>,
    pub risk_factor_count: usize,
}

impl SummaryMetrics {
    /// Fails only when the total does not fit in `Money`, which a validated
    /// register rules out.
    pub fn from_entries(entries: &[RiskEntry]) -> Result<Self, AppError> {
        let total = RiskMetricComputer::total_loss_expectancy(entries)?;
        let highest = RiskMetricComputer::max_loss_entry(entries).ok();
        let highest_loss = highest.map(RiskEntry::annual_loss_expectancy);

        Ok(Self {
            total_loss_expectancy: total,
            total_loss_display: total.display_major(),
            highest_single_loss: highest_loss,
            highest_single_loss_display: highest_loss.map(Money::display_major),
            highest_single_loss_title: highest.map(RiskEntry::title),
            risk_factor_count: RiskMetricComputer::entry_count(entries),
        })
    }
}

/// Options for the asset selector: `"All"` followed by each distinct asset
/// in first-occurrence order.
pub fn asset_options(entries: &[RiskEntry]) -> Vec<String> {
    let mut options = vec![AssetSelector::ALL_LABEL.to_string()];
    for entry in entries {
        if !options[1..].contains(&entry.asset) {
            options.push(entry.asset.clone());
        }
    }
    options
}

/// One bar of the loss-by-asset chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub asset: String,
    pub annual_loss_expectancy: Money,
    pub aro_label: String,
    pub justification: String,
}

/// Bars sharing a vulnerability, i.e. one colour in the chart legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub vulnerability: String,
    pub points: Vec<BarPoint>,
}

/// Annual loss expectancy by asset, grouped by vulnerability. Series appear in
/// order of their first entry.
pub fn loss_by_asset(entries: &[RiskEntry]) -> Vec<BarSeries> {
    let mut series: Vec<BarSeries> = Vec::new();
    for entry in entries {
        let point = BarPoint {
            asset: entry.asset.clone(),
            annual_loss_expectancy: entry.annual_loss_expectancy(),
            aro_label: entry.aro_label.clone(),
            justification: entry.justification.clone(),
        };
        match series
            .iter_mut()
            .find(|s| s.vulnerability == entry.vulnerability)
        {
            Some(existing) => existing.points.push(point),
            None => series.push(BarSeries {
                vulnerability: entry.vulnerability.clone(),
                points: vec![point],
            }),
        }
    }
    series
}

/// One bubble of the risk matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixPoint {
    pub label: String,
    /// x axis
    pub exposure_factor: f64,
    /// y axis
    pub asset_value: u8,
    /// Bubble area, proportional to annual loss expectancy.
    pub bubble_size: f64,
    /// Colour scale input.
    pub annual_rate: f64,
}

pub fn risk_matrix(entries: &[RiskEntry]) -> Vec<MatrixPoint> {
    entries
        .iter()
        .map(|entry| MatrixPoint {
            label: entry.vulnerability.clone(),
            exposure_factor: entry.exposure_factor.as_fraction(),
            asset_value: entry.asset_value,
            bubble_size: entry.annual_loss_expectancy().as_major_f64() / BUBBLE_SIZE_DIVISOR,
            annual_rate: entry.annual_rate.per_year(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub asset: String,
    pub vulnerability: String,
    pub aro_label: String,
    pub annual_loss_expectancy: Money,
    pub annual_loss_display: String,
    pub justification: String,
}

/// Detail table, highest annual loss expectancy first.
pub fn risk_table(entries: &[RiskEntry]) -> Vec<TableRow> {
    RiskMetricComputer::sort_by_loss_descending(entries)
        .into_iter()
        .map(|entry| {
            let ale = entry.annual_loss_expectancy();
            TableRow {
                asset: entry.asset.clone(),
                vulnerability: entry.vulnerability.clone(),
                aro_label: entry.aro_label.clone(),
                annual_loss_expectancy: ale,
                annual_loss_display: ale.display_major(),
                justification: entry.justification.clone(),
            }
        })
        .collect()
}

/// An expandable detail card for one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDetail {
    pub title: String,
    pub base_value: Money,
    pub base_value_display: String,
    pub exposure_factor_display: String,
    pub annual_rate: f64,
    /// e.g. `12 (Monthly)`
    pub annual_rate_display: String,
    pub annual_loss_expectancy: Money,
    pub annual_loss_display: String,
    pub justification: String,
}

impl From<&RiskEntry> for RiskDetail {
    fn from(entry: &RiskEntry) -> Self {
        let ale = entry.annual_loss_expectancy();
        Self {
            title: entry.title(),
            base_value: entry.base_value,
            base_value_display: entry.base_value.display_major(),
            exposure_factor_display: entry.exposure_factor.percent(),
            annual_rate: entry.annual_rate.per_year(),
            annual_rate_display: format!("{} ({})", entry.annual_rate, entry.aro_label),
            annual_loss_expectancy: ale,
            annual_loss_display: ale.display_major(),
            justification: entry.justification.clone(),
        }
    }
}

/// Detail cards for the entries matching `selector`, in register order.
pub fn risk_details(entries: &[RiskEntry], selector: &AssetSelector) -> Vec<RiskDetail> {
    RiskMetricComputer::filter_by_asset(entries, selector)
        .into_iter()
        .map(RiskDetail::from)
        .collect()
}

/// Everything the dashboard page needs, in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub selected_asset: String,
    pub summary: SummaryMetrics,
    pub asset_options: Vec<String>,
    pub loss_by_asset: Vec<BarSeries>,
    pub risk_matrix: Vec<MatrixPoint>,
    pub table: Vec<TableRow>,
    pub details: Vec<RiskDetail>,
}

impl Dashboard {
    /// Headline metrics, charts and table cover the whole register; only the
    /// detail cards follow the asset selector.
    pub fn build(
        register: &RiskRegister,
        selector: &AssetSelector,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let entries = register.entries();
        Ok(Self {
            generated_at,
            selected_asset: selector.to_string(),
            summary: SummaryMetrics::from_entries(entries)?,
            asset_options: asset_options(entries),
            loss_by_asset: loss_by_asset(entries),
            risk_matrix: risk_matrix(entries),
            table: risk_table(entries),
            details: risk_details(entries, selector),
        })
    }
}
