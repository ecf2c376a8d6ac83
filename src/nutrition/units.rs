//! Unit types and nutrition multipliers
//!
//! Meal plan ingredients are measured in grams, milliliters, or whole
//! servable units (pieces, portions, slices). Every place that turns an
//! ingredient amount into nutrition goes through [`unit_multiplier`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reference amount for continuous nutrition values (per 100 g / 100 ml)
pub const PER_100: f64 = 100.0;

/// Measurement unit of a meal plan ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MealUnit {
    /// Weight in grams; also used for unlabeled amounts
    #[default]
    Gram,
    /// Volume in milliliters, treated as equivalent to grams
    Ml,
    /// Whole pieces (eggs, fruit, rice cakes)
    Stuks,
    /// Portions (a scoop, a serving)
    Portie,
    /// Slices (bread)
    Sneden,
}

/// Whether a unit is counted in whole items or measured continuously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Continuous,
    Discrete,
}

/// The reference quantity a nutrition table entry is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutritionBasis {
    /// Values per 100 grams or 100 milliliters
    Per100,
    /// Values per single piece, slice, or portion
    PerUnit,
}

impl NutritionBasis {
    /// The unit kind this basis is meant to be measured in
    pub fn expected_kind(&self) -> UnitKind {
        match self {
            NutritionBasis::Per100 => UnitKind::Continuous,
            NutritionBasis::PerUnit => UnitKind::Discrete,
        }
    }
}

impl MealUnit {
    /// Canonical string used in plan JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            MealUnit::Gram => "gram",
            MealUnit::Ml => "ml",
            MealUnit::Stuks => "stuks",
            MealUnit::Portie => "portie",
            MealUnit::Sneden => "sneden",
        }
    }

    /// Parse a unit label. Unknown labels fall back to grams.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ml" | "milliliter" | "milliliters" => MealUnit::Ml,
            "stuk" | "stuks" => MealUnit::Stuks,
            "portie" | "porties" => MealUnit::Portie,
            "snede" | "sneden" => MealUnit::Sneden,
            "g" | "gr" | "gram" | "grams" | "" => MealUnit::Gram,
            other => {
                tracing::debug!("Unknown meal unit '{}', treating as gram", other);
                MealUnit::Gram
            }
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            MealUnit::Stuks | MealUnit::Portie | MealUnit::Sneden => UnitKind::Discrete,
            MealUnit::Gram | MealUnit::Ml => UnitKind::Continuous,
        }
    }

    pub fn is_discrete(&self) -> bool {
        self.kind() == UnitKind::Discrete
    }
}

impl Serialize for MealUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MealUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| MealUnit::parse(&s)).unwrap_or_default())
    }
}

/// Multiplier to apply to a table entry's nutrition for `amount` of `unit`
///
/// Discrete units count whole items, so the amount is the multiplier.
/// Grams and milliliters are scaled against the per-100 reference.
pub fn unit_multiplier(amount: f64, unit: MealUnit) -> f64 {
    match unit.kind() {
        UnitKind::Discrete => amount,
        UnitKind::Continuous => amount / PER_100,
    }
}
