//! Ingredient nutrition table
//!
//! Static lookup from ingredient name to macro values. Names match exactly
//! and case-sensitively; synonyms are listed as separate entries.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use super::units::NutritionBasis;
use crate::models::Macros;

/// Nutrition values for one ingredient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IngredientNutrition {
    pub name: &'static str,
    #[serde(flatten)]
    pub nutrition: Macros,
    pub basis: NutritionBasis,
}

/// Immutable ingredient lookup table
#[derive(Debug, Clone, Default)]
pub struct IngredientTable {
    entries: HashMap<&'static str, IngredientNutrition>,
}

impl IngredientTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = IngredientNutrition>,
    {
        Self {
            entries: entries.into_iter().map(|e| (e.name, e)).collect(),
        }
    }

    /// Exact-match lookup; `None` when the name is unknown
    pub fn lookup(&self, name: &str) -> Option<&IngredientNutrition> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name
    pub fn entries(&self) -> Vec<&IngredientNutrition> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by_key(|e| e.name);
        all
    }
}

const fn per_100(name: &'static str, calories: f64, protein: f64, carbs: f64, fat: f64) -> IngredientNutrition {
    IngredientNutrition {
        name,
        nutrition: Macros::new(calories, protein, carbs, fat),
        basis: NutritionBasis::Per100,
    }
}

const fn per_unit(name: &'static str, calories: f64, protein: f64, carbs: f64, fat: f64) -> IngredientNutrition {
    IngredientNutrition {
        name,
        nutrition: Macros::new(calories, protein, carbs, fat),
        basis: NutritionBasis::PerUnit,
    }
}

const INGREDIENTS: &[IngredientNutrition] = &[
    // Grains and starches (per 100 g, dry weight where applicable)
    per_100("Havermout", 372.0, 13.5, 58.7, 7.0),
    per_100("Rijst", 350.0, 7.0, 77.0, 0.6),
    per_100("Zilvervliesrijst", 353.0, 7.7, 73.0, 2.8),
    per_100("Volkoren pasta", 348.0, 13.0, 63.0, 2.5),
    per_100("Aardappelen", 77.0, 2.0, 17.0, 0.1),
    per_100("Zoete aardappel", 86.0, 1.6, 20.1, 0.1),
    // Protein
    per_100("Kipfilet", 110.0, 23.6, 0.0, 1.8),
    per_100("Kalkoenfilet", 104.0, 24.0, 0.0, 1.0),
    per_100("Mager rundergehakt", 180.0, 20.0, 0.0, 11.0),
    per_100("Zalm", 208.0, 20.0, 0.0, 13.4),
    per_100("Tonijn", 108.0, 25.0, 0.0, 1.0),
    // Dairy
    per_100("Magere kwark", 57.0, 10.0, 3.8, 0.2),
    per_100("Griekse yoghurt", 97.0, 9.0, 3.6, 5.0),
    per_100("Cottage cheese", 98.0, 11.1, 3.4, 4.3),
    per_100("Kaas (30+)", 290.0, 30.0, 0.0, 18.0),
    per_100("Halfvolle melk", 46.0, 3.5, 4.7, 1.5),
    per_100("Amandelmelk", 13.0, 0.4, 0.1, 1.1),
    // Vegetables and fruit
    per_100("Broccoli", 34.0, 2.8, 7.0, 0.4),
    per_100("Spinazie", 23.0, 2.9, 3.6, 0.4),
    per_100("Sperziebonen", 31.0, 1.8, 7.0, 0.1),
    per_100("Paprika", 31.0, 1.0, 6.0, 0.3),
    per_100("Blauwe bessen", 57.0, 0.7, 14.5, 0.3),
    per_100("Avocado", 160.0, 2.0, 8.5, 14.7),
    // Fats, nuts, spreads
    per_100("Amandelen", 579.0, 21.2, 21.6, 49.9),
    per_100("Walnoten", 654.0, 15.2, 13.7, 65.2),
    per_100("Pindakaas", 588.0, 25.0, 20.0, 50.0),
    per_100("Olijfolie", 884.0, 0.0, 0.0, 100.0),
    per_100("Hummus", 166.0, 7.9, 14.3, 9.6),
    per_100("Honing", 304.0, 0.3, 82.4, 0.0),
    // Counted items (per piece, slice, or portion)
    per_unit("Ei", 78.0, 6.3, 0.6, 5.3),
    per_unit("Eieren", 78.0, 6.3, 0.6, 5.3),
    per_unit("Volkoren brood", 85.0, 4.0, 14.0, 1.1),
    per_unit("Volkoren wrap", 170.0, 5.0, 28.0, 4.0),
    per_unit("Rijstwafel", 28.0, 0.6, 6.0, 0.2),
    per_unit("Banaan", 105.0, 1.3, 27.0, 0.4),
    per_unit("Appel", 95.0, 0.5, 25.0, 0.3),
    per_unit("Whey proteïne", 120.0, 24.0, 3.0, 1.5),
    per_unit("Proteïnereep", 200.0, 20.0, 20.0, 7.0),
];

static INGREDIENT_TABLE: LazyLock<IngredientTable> =
    LazyLock::new(|| IngredientTable::from_entries(INGREDIENTS.iter().copied()));

/// The process-wide ingredient table, built on first use
pub fn ingredient_table() -> &'static IngredientTable {
    &INGREDIENT_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_match() {
        let table = ingredient_table();
        let kip = table.lookup("Kipfilet").unwrap();
        assert_eq!(kip.nutrition.calories, 110.0);
        assert_eq!(kip.basis, NutritionBasis::Per100);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = ingredient_table();
        assert!(table.lookup("kipfilet").is_none());
        assert!(table.lookup("Kipfilet ").is_none());
    }

    #[test]
    fn test_synonyms_are_separate_identical_entries() {
        let table = ingredient_table();
        let ei = table.lookup("Ei").unwrap();
        let eieren = table.lookup("Eieren").unwrap();
        assert_eq!(ei.nutrition, eieren.nutrition);
        assert_eq!(ei.basis, NutritionBasis::PerUnit);
    }

    #[test]
    fn test_no_duplicate_names() {
        assert_eq!(ingredient_table().len(), INGREDIENTS.len());
    }

    #[test]
    fn test_all_values_non_negative() {
        for entry in ingredient_table().entries() {
            let n = entry.nutrition;
            assert!(n.calories >= 0.0 && n.protein >= 0.0 && n.carbs >= 0.0 && n.fat >= 0.0, "{}", entry.name);
        }
    }
}
