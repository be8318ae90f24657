//! Risk register — the immutable table of risk entries every dashboard view is derived from.
//!
//! The register is built once at startup, either from the compiled-in reference
//! data or from a JSON file, and is read-only afterwards. External rows are
//! validated field by field; a bad row fails the whole load with the row number
//! and field name instead of being coerced.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use riskview_common::error::AppError;
use riskview_common::types::{AnnualRate, ExposureFactor, Money, RiskEntry};

/// Fields accepted in an external register row.
const KNOWN_FIELDS: &[&str] = &[
    "asset",
    "vulnerability",
    "asset_value",
    "exposure_factor",
    "base_value",
    "annual_rate",
    "aro_label",
    "justification",
];

/// Row number used for errors that concern the document rather than a row.
const DOCUMENT_ROW: usize = 0;

struct ReferenceRow {
    asset: &'static str,
    vulnerability: &'static str,
    asset_value: u8,
    exposure_factor: ExposureFactor,
    base_value: Money,
    annual_rate: AnnualRate,
    aro_label: &'static str,
    justification: &'static str,
}

/// The seven-row reference register. Ranged base values are collapsed to a
/// single point value; exposure factors are fractions.
const REFERENCE_REGISTER: [ReferenceRow; 7] = [
    ReferenceRow {
        asset: "Electronic Data",
        vulnerability: "Human Error",
        asset_value: 5,
        exposure_factor: ExposureFactor::from_basis_points(8_000),
        base_value: Money::from_major(1_000_000),
        annual_rate: AnnualRate::from_whole(12),
        aro_label: "Monthly",
        justification: "Top risk from mental stress and physical fatigue",
    },
    ReferenceRow {
        asset: "Electronic Data",
        vulnerability: "SQL Injection",
        asset_value: 5,
        exposure_factor: ExposureFactor::from_basis_points(8_000),
        base_value: Money::from_major(1_000_000),
        annual_rate: AnnualRate::from_whole(12),
        aro_label: "Monthly",
        justification: "Requires firewall and intrusion prevention",
    },
    ReferenceRow {
        asset: "Revenue Management System",
        vulnerability: "Cross-Site Scripting",
        asset_value: 3,
        exposure_factor: ExposureFactor::from_basis_points(7_000),
        base_value: Money::from_major(300_000),
        annual_rate: AnnualRate::from_whole(4),
        aro_label: "Quarterly",
        justification: "Needs Data Leakage Prevention systems",
    },
    ReferenceRow {
        asset: "Revenue Management System",
        vulnerability: "Denial of Services",
        asset_value: 3,
        exposure_factor: ExposureFactor::from_basis_points(6_000),
        base_value: Money::from_major(300_000),
        annual_rate: AnnualRate::from_whole(1),
        aro_label: "Annually",
        justification: "Caused by low memory and bandwidth limitations",
    },
    ReferenceRow {
        asset: "IT Hardware",
        vulnerability: "Power Interruptions",
        asset_value: 2,
        exposure_factor: ExposureFactor::from_basis_points(9_000),
        base_value: Money::from_major(50_000),
        annual_rate: AnnualRate::from_whole(52),
        aro_label: "Weekly",
        justification: "Requires backup power generators",
    },
    ReferenceRow {
        asset: "Reputation",
        vulnerability: "Data Breach",
        asset_value: 5,
        exposure_factor: ExposureFactor::from_basis_points(6_000),
        base_value: Money::from_major(1_000_000),
        annual_rate: AnnualRate::from_whole(1),
        aro_label: "Annually",
        justification: "Significant impact on organizational value",
    },
    ReferenceRow {
        asset: "Staff",
        vulnerability: "Social Engineering",
        asset_value: 2,
        exposure_factor: ExposureFactor::from_basis_points(9_000),
        base_value: Money::from_major(50_000),
        annual_rate: AnnualRate::from_whole(52),
        aro_label: "Weekly",
        justification: "Mitigated through security awareness training",
    },
];

impl ReferenceRow {
    fn to_entry(&self) -> RiskEntry {
        RiskEntry {
            asset: self.asset.to_string(),
            vulnerability: self.vulnerability.to_string(),
            asset_value: self.asset_value,
            exposure_factor: self.exposure_factor,
            base_value: self.base_value,
            annual_rate: self.annual_rate,
            aro_label: self.aro_label.to_string(),
            justification: self.justification.to_string(),
        }
    }
}

/// A row whose cadence label disagrees with its numeric annual rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadenceMismatch {
    /// 1-based row number.
    pub row: usize,
    pub title: String,
    pub aro_label: String,
    pub annual_rate: f64,
    pub expected_rate: f64,
}

/// Immutable risk register.
#[derive(Debug, Clone)]
pub struct RiskRegister {
    entries: Vec<RiskEntry>,
}

impl RiskRegister {
    /// The compiled-in reference register. Never fails.
    pub fn load() -> Self {
        Self {
            entries: REFERENCE_REGISTER.iter().map(ReferenceRow::to_entry).collect(),
        }
    }

    /// Build a register from already-typed entries, checking the constraints
    /// the types themselves cannot express.
    pub fn from_entries(entries: Vec<RiskEntry>) -> Result<Self, AppError> {
        for (idx, entry) in entries.iter().enumerate() {
            let row = idx + 1;
            if entry.asset.trim().is_empty() {
                return Err(AppError::data_format(row, "asset", "must not be empty"));
            }
            if entry.vulnerability.trim().is_empty() {
                return Err(AppError::data_format(row, "vulnerability", "must not be empty"));
            }
            check_asset_value(row, entry.asset_value as u64)?;
        }
        check_loss_range(&entries)?;
        Ok(Self { entries })
    }

    /// Parse a register from a JSON array of row objects.
    ///
    /// Each row must carry every field in [`KNOWN_FIELDS`]; `base_value` is in
    /// major currency units and `exposure_factor` is a fraction in [0, 1].
    /// Annual loss expectancy is always derived and is rejected if present.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| AppError::data_format(DOCUMENT_ROW, "$", e.to_string()))?;

        let rows = document.as_array().ok_or_else(|| {
            AppError::data_format(DOCUMENT_ROW, "$", "expected a JSON array of risk entries")
        })?;

        let entries = rows
            .iter()
            .enumerate()
            .map(|(idx, value)| parse_row(idx + 1, value))
            .collect::<Result<Vec<_>, _>>()?;
        check_loss_range(&entries)?;

        let register = Self { entries };
        for mismatch in register.cadence_mismatches() {
            tracing::warn!(
                row = mismatch.row,
                label = %mismatch.aro_label,
                annual_rate = mismatch.annual_rate,
                expected_rate = mismatch.expected_rate,
                "Cadence label disagrees with annual rate for {}",
                mismatch.title
            );
        }
        Ok(register)
    }

    /// Read and parse a register file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        let register = Self::from_json_str(&json)?;
        tracing::info!(
            entries = register.len(),
            path = %path.display(),
            "Risk register loaded from file"
        );
        Ok(register)
    }

    pub fn entries(&self) -> &[RiskEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows whose cadence label names a known period that does not match the
    /// numeric annual rate. Unknown labels are skipped. Nothing is corrected.
    pub fn cadence_mismatches(&self) -> Vec<CadenceMismatch> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let expected = expected_rate_for_label(&entry.aro_label)?;
                (expected != entry.annual_rate).then(|| CadenceMismatch {
                    row: idx + 1,
                    title: entry.title(),
                    aro_label: entry.aro_label.clone(),
                    annual_rate: entry.annual_rate.per_year(),
                    expected_rate: expected.per_year(),
                })
            })
            .collect()
    }
}

/// Annual rate implied by a cadence label, if the label is one we recognise.
pub fn expected_rate_for_label(label: &str) -> Option<AnnualRate> {
    let per_year = match label.trim().to_ascii_lowercase().as_str() {
        "daily" => 365,
        "weekly" => 52,
        "monthly" => 12,
        "quarterly" => 4,
        "annually" | "yearly" => 1,
        _ => return None,
    };
    Some(AnnualRate::from_whole(per_year))
}

fn parse_row(row: usize, value: &Value) -> Result<RiskEntry, AppError> {
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::data_format(row, "$", "expected a JSON object"))?;

    if let Some(unknown) = obj.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
        let reason = if unknown == "annual_loss_expectancy" {
            "derived field; it is computed from the other fields and must not be supplied"
        } else {
            "unknown field"
        };
        return Err(AppError::data_format(row, unknown.as_str(), reason));
    }

    let asset = non_empty_string(obj, row, "asset")?;
    let vulnerability = non_empty_string(obj, row, "vulnerability")?;

    let asset_value = required(obj, row, "asset_value")?
        .as_u64()
        .ok_or_else(|| AppError::data_format(row, "asset_value", "expected an integer"))?;
    let asset_value = check_asset_value(row, asset_value)?;

    let fraction = number(obj, row, "exposure_factor")?;
    let exposure_factor = ExposureFactor::from_fraction(fraction).ok_or_else(|| {
        AppError::data_format(
            row,
            "exposure_factor",
            format!("must be within [0, 1] with at most four decimal places, got {fraction}"),
        )
    })?;

    let base = number(obj, row, "base_value")?;
    let base_value = Money::from_major_f64(base).ok_or_else(|| {
        AppError::data_format(
            row,
            "base_value",
            format!("must be a non-negative amount in whole pence, got {base}"),
        )
    })?;

    let rate = number(obj, row, "annual_rate")?;
    let annual_rate = AnnualRate::from_per_year(rate).ok_or_else(|| {
        AppError::data_format(
            row,
            "annual_rate",
            format!("must be a non-negative rate with at most three decimal places, got {rate}"),
        )
    })?;

    Ok(RiskEntry {
        asset,
        vulnerability,
        asset_value,
        exposure_factor,
        base_value,
        annual_rate,
        aro_label: string(obj, row, "aro_label")?,
        justification: string(obj, row, "justification")?,
    })
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    row: usize,
    field: &'static str,
) -> Result<&'a Value, AppError> {
    obj.get(field)
        .ok_or_else(|| AppError::data_format(row, field, "missing"))
}

fn string(obj: &Map<String, Value>, row: usize, field: &'static str) -> Result<String, AppError> {
    required(obj, row, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::data_format(row, field, "expected a string"))
}

fn non_empty_string(
    obj: &Map<String, Value>,
    row: usize,
    field: &'static str,
) -> Result<String, AppError> {
    let value = string(obj, row, field)?;
    if value.trim().is_empty() {
        return Err(AppError::data_format(row, field, "must not be empty"));
    }
    Ok(value)
}

fn number(obj: &Map<String, Value>, row: usize, field: &'static str) -> Result<f64, AppError> {
    required(obj, row, field)?
        .as_f64()
        .ok_or_else(|| AppError::data_format(row, field, "expected a number"))
}

/// Every row's annual loss expectancy, and their running total, must fit in
/// `Money`. Blamed on `base_value`, the only unbounded input.
fn check_loss_range(entries: &[RiskEntry]) -> Result<(), AppError> {
    let mut total = Money::ZERO;
    for (idx, entry) in entries.iter().enumerate() {
        let row = idx + 1;
        let ale = entry.checked_annual_loss_expectancy().ok_or_else(|| {
            AppError::data_format(
                row,
                "base_value",
                "annual loss expectancy exceeds the representable range",
            )
        })?;
        total = total.checked_add(ale).ok_or_else(|| {
            AppError::data_format(
                row,
                "base_value",
                "total annual loss expectancy exceeds the representable range",
            )
        })?;
    }
    Ok(())
}

fn check_asset_value(row: usize, value: u64) -> Result<u8, AppError> {
    match value {
        1..=5 => Ok(value as u8),
        _ => Err(AppError::data_format(
            row,
            "asset_value",
            format!("must be between 1 and 5, got {value}"),
        )),
    }
}
