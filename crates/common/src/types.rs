use serde::{Deserialize, Serialize};

/// Minor units (pence) per major currency unit.
const MINOR_PER_MAJOR: u64 = 100;

/// Basis points in a whole exposure (100%).
const BASIS_POINTS_PER_UNIT: u16 = 10_000;

/// Thousandths of an incident per whole incident.
const MILLI_PER_UNIT: u32 = 1_000;

/// Scale a decimal input onto an integer grid. Returns `None` when the input
/// carries more precision than the grid can hold or exceeds `max`.
fn to_fixed_point(value: f64, scale: f64, max: f64) -> Option<f64> {
    let scaled = value * scale;
    let rounded = scaled.round();
    // Absorbs binary representation error (0.07 * 10_000 = 700.0000000000001)
    let tolerance = 1e-6_f64.max(scaled.abs() * f64::EPSILON * 4.0);
    if (scaled - rounded).abs() > tolerance || rounded > max {
        return None;
    }
    Some(rounded)
}

/// Fixed-point currency amount held in minor units (pence).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(u64::MAX);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    /// Convert a major-unit amount (e.g. `1250.50`) to fixed point.
    ///
    /// Returns `None` for negative or non-finite amounts, amounts with
    /// fractions of a penny, and amounts beyond the `u64` range.
    pub fn from_major_f64(major: f64) -> Option<Self> {
        if !major.is_finite() || major < 0.0 {
            return None;
        }
        // u64::MAX is not exactly representable; stay strictly below 2^64
        let minor = to_fixed_point(major, MINOR_PER_MAJOR as f64, u64::MAX as f64)?;
        if minor >= u64::MAX as f64 {
            return None;
        }
        Some(Self(minor as u64))
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn as_major_f64(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Render as whole pounds with thousands separators, e.g. `£9,600,000`.
    /// Pence round half-up.
    pub fn display_major(self) -> String {
        let pounds =
            self.0 / MINOR_PER_MAJOR + u64::from(self.0 % MINOR_PER_MAJOR >= MINOR_PER_MAJOR / 2);
        let digits = pounds.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        grouped.push('£');
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR)
    }
}

/// Fraction of an asset's value lost when a vulnerability is realized,
/// held in basis points (0..=10_000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExposureFactor(u16);

impl ExposureFactor {
    /// Panics when `bp` exceeds 10_000; in a const context that is a compile error.
    pub const fn from_basis_points(bp: u16) -> Self {
        assert!(bp <= BASIS_POINTS_PER_UNIT, "exposure factor above 100%");
        Self(bp)
    }

    /// Returns `None` unless `fraction` is finite, within [0, 1] and a whole
    /// number of basis points (at most four decimal places).
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return None;
        }
        let bp = BASIS_POINTS_PER_UNIT as f64;
        to_fixed_point(fraction, bp, bp).map(|bp| Self(bp as u16))
    }

    pub const fn basis_points(self) -> u16 {
        self.0
    }

    pub fn as_fraction(self) -> f64 {
        self.0 as f64 / BASIS_POINTS_PER_UNIT as f64
    }

    /// e.g. `80.0%`
    pub fn percent(self) -> String {
        format!("{:.1}%", self.as_fraction() * 100.0)
    }
}

/// Expected incidents per year, held in thousandths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnualRate(u32);

impl AnnualRate {
    pub const fn from_whole(per_year: u32) -> Self {
        Self(per_year * MILLI_PER_UNIT)
    }

    pub const fn from_milli(milli: u32) -> Self {
        Self(milli)
    }

    /// Returns `None` for negative, non-finite or out-of-range rates, and for
    /// rates finer than a thousandth of an incident per year.
    pub fn from_per_year(per_year: f64) -> Option<Self> {
        if !per_year.is_finite() || per_year < 0.0 {
            return None;
        }
        to_fixed_point(per_year, MILLI_PER_UNIT as f64, u32::MAX as f64)
            .map(|milli| Self(milli as u32))
    }

    pub const fn milli(self) -> u32 {
        self.0
    }

    pub fn per_year(self) -> f64 {
        self.0 as f64 / MILLI_PER_UNIT as f64
    }
}

impl std::fmt::Display for AnnualRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % MILLI_PER_UNIT == 0 {
            write!(f, "{}", self.0 / MILLI_PER_UNIT)
        } else {
            write!(f, "{}", self.per_year())
        }
    }
}

/// A single row of the risk register.
///
/// Annual loss expectancy is not stored; it is derived from base value,
/// exposure factor and annual rate on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskEntry {
    pub asset: String,
    pub vulnerability: String,
    /// Relative importance score, 1..=5.
    pub asset_value: u8,
    pub exposure_factor: ExposureFactor,
    /// Single-incident loss estimate.
    pub base_value: Money,
    pub annual_rate: AnnualRate,
    /// Descriptive cadence label ("Monthly", "Weekly", ...). Carries no logic.
    pub aro_label: String,
    pub justification: String,
}

impl RiskEntry {
    /// ALE = base value × exposure factor × annual rate, rounded half-up to
    /// the nearest minor unit. `None` when the result does not fit in `Money`.
    ///
    /// The `u128` product cannot overflow: it is bounded by
    /// `u64::MAX × 10_000 × u32::MAX`, well under `u128::MAX`.
    pub fn checked_annual_loss_expectancy(&self) -> Option<Money> {
        let scale = BASIS_POINTS_PER_UNIT as u128 * MILLI_PER_UNIT as u128;
        let product = self.base_value.minor() as u128
            * self.exposure_factor.basis_points() as u128
            * self.annual_rate.milli() as u128;
        let minor = (product + scale / 2) / scale;
        u64::try_from(minor).ok().map(Money::from_minor)
    }

    /// ALE of an entry known to fit, which every entry of a validated
    /// register does. Entries built by hand that overflow report `Money::MAX`;
    /// use [`RiskEntry::checked_annual_loss_expectancy`] for those.
    pub fn annual_loss_expectancy(&self) -> Money {
        self.checked_annual_loss_expectancy().unwrap_or(Money::MAX)
    }

    /// Expander title used by the detail list, e.g. `Staff - Social Engineering`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.asset, self.vulnerability)
    }
}

#[derive(Serialize)]
struct RiskEntryJson<'a> {
    asset: &'a str,
    vulnerability: &'a str,
    asset_value: u8,
    exposure_factor: f64,
    base_value: Money,
    annual_rate: f64,
    annual_loss_expectancy: Money,
    aro_label: &'a str,
    justification: &'a str,
}

impl Serialize for RiskEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RiskEntryJson {
            asset: &self.asset,
            vulnerability: &self.vulnerability,
            asset_value: self.asset_value,
            exposure_factor: self.exposure_factor.as_fraction(),
            base_value: self.base_value,
            annual_rate: self.annual_rate.per_year(),
            annual_loss_expectancy: self.annual_loss_expectancy(),
            aro_label: &self.aro_label,
            justification: &self.justification,
        }
        .serialize(serializer)
    }
}

/// Asset filter. The literal `"All"` selects every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AssetSelector {
    #[default]
    All,
    Asset(String),
}

impl AssetSelector {
    pub const ALL_LABEL: &'static str = "All";

    pub fn matches(&self, entry: &RiskEntry) -> bool {
        match self {
            AssetSelector::All => true,
            AssetSelector::Asset(name) => entry.asset == *name,
        }
    }
}

impl From<&str> for AssetSelector {
    fn from(value: &str) -> Self {
        if value == Self::ALL_LABEL {
            AssetSelector::All
        } else {
            AssetSelector::Asset(value.to_string())
        }
    }
}

impl From<String> for AssetSelector {
    fn from(value: String) -> Self {
        if value == Self::ALL_LABEL {
            AssetSelector::All
        } else {
            AssetSelector::Asset(value)
        }
    }
}

impl std::fmt::Display for AssetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSelector::All => write!(f, "{}", Self::ALL_LABEL),
            AssetSelector::Asset(name) => write!(f, "{name}"),
        }
    }
}
