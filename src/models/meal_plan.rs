//! Weekly meal plan structures
//!
//! A weekly plan maps day names to days; a day maps meal types to ordered
//! ingredient lists. The same shapes carry both template plans and scaled
//! plans, parameterised over the ingredient type.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::nutrition::MealUnit;

/// Recognised meal slots, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Ontbijt,
    Lunch,
    LunchSnack,
    AvondSnack,
    Diner,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Ontbijt,
        MealType::Lunch,
        MealType::LunchSnack,
        MealType::AvondSnack,
        MealType::Diner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Ontbijt => "ontbijt",
            MealType::Lunch => "lunch",
            MealType::LunchSnack => "lunch_snack",
            MealType::AvondSnack => "avond_snack",
            MealType::Diner => "diner",
        }
    }
}

/// One ingredient line of a template meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIngredient {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: MealUnit,
}

impl MealIngredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: MealUnit) -> Self {
        Self {
            name: name.into(),
            amount,
            unit,
        }
    }
}

/// Meal lists of a single day; absent meals stay absent on output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de>"))]
pub struct DayMeals<I> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontbijt: Option<Vec<I>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Vec<I>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_snack: Option<Vec<I>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avond_snack: Option<Vec<I>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diner: Option<Vec<I>>,
}

impl<I> Default for DayMeals<I> {
    fn default() -> Self {
        Self {
            ontbijt: None,
            lunch: None,
            lunch_snack: None,
            avond_snack: None,
            diner: None,
        }
    }
}

impl<I> DayMeals<I> {
    pub fn get(&self, meal_type: MealType) -> Option<&Vec<I>> {
        match meal_type {
            MealType::Ontbijt => self.ontbijt.as_ref(),
            MealType::Lunch => self.lunch.as_ref(),
            MealType::LunchSnack => self.lunch_snack.as_ref(),
            MealType::AvondSnack => self.avond_snack.as_ref(),
            MealType::Diner => self.diner.as_ref(),
        }
    }

    pub fn set(&mut self, meal_type: MealType, items: Vec<I>) {
        let slot = match meal_type {
            MealType::Ontbijt => &mut self.ontbijt,
            MealType::Lunch => &mut self.lunch,
            MealType::LunchSnack => &mut self.lunch_snack,
            MealType::AvondSnack => &mut self.avond_snack,
            MealType::Diner => &mut self.diner,
        };
        *slot = Some(items);
    }

    /// Present meals in processing order
    pub fn iter(&self) -> impl Iterator<Item = (MealType, &[I])> + '_ {
        MealType::ALL
            .into_iter()
            .filter_map(move |t| self.get(t).map(|items| (t, items.as_slice())))
    }

    pub fn has_ingredients(&self) -> bool {
        self.iter().any(|(_, items)| !items.is_empty())
    }
}

/// Totals recorded on a template day; only calories are consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedTotals {
    #[serde(default)]
    pub calories: Option<f64>,
}

/// A template day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(flatten)]
    pub meals: DayMeals<MealIngredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_totals: Option<RecordedTotals>,
}

/// Day name to day, kept in document order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedDays<T> {
    days: Vec<(String, T)>,
}

impl<T> Default for OrderedDays<T> {
    fn default() -> Self {
        Self { days: Vec::new() }
    }
}

impl<T> OrderedDays<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a day, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, day: T) {
        let name = name.into();
        match self.days.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = day,
            None => self.days.push((name, day)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.days.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.days.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.days.iter().map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for OrderedDays<T> {
    fn from_iter<It: IntoIterator<Item = (String, T)>>(iter: It) -> Self {
        let mut days = OrderedDays::new();
        for (name, day) in iter {
            days.insert(name, day);
        }
        days
    }
}

impl<T: Serialize> Serialize for OrderedDays<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (name, day) in &self.days {
            map.serialize_entry(name, day)?;
        }
        map.end()
    }
}

struct OrderedDaysVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedDaysVisitor<T> {
    type Value = OrderedDays<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of day names to day plans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut days = OrderedDays::new();
        while let Some((name, day)) = access.next_entry::<String, T>()? {
            days.insert(name, day);
        }
        Ok(days)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedDays<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedDaysVisitor(PhantomData))
    }
}

/// A template weekly plan
pub type WeeklyPlan = OrderedDays<DayPlan>;

impl WeeklyPlan {
    /// True when at least one day has at least one ingredient
    pub fn has_meal_data(&self) -> bool {
        self.values().any(|d| d.meals.has_ingredients())
    }

    /// Check ingredient lines: non-empty names, finite positive amounts
    pub fn validate(&self) -> Result<(), String> {
        for (day_name, day) in self.iter() {
            for (meal_type, items) in day.meals.iter() {
                for item in items {
                    if item.name.trim().is_empty() {
                        return Err(format!(
                            "{} / {}: ingredient name cannot be empty",
                            day_name,
                            meal_type.as_str()
                        ));
                    }
                    if !item.amount.is_finite() || item.amount <= 0.0 {
                        return Err(format!(
                            "{} / {} / {}: amount must be greater than 0 (got {})",
                            day_name,
                            meal_type.as_str(),
                            item.name,
                            item.amount
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a plan from its JSON form
    pub fn from_json(json: &str) -> Result<Self, String> {
        let plan: WeeklyPlan =
            serde_json::from_str(json).map_err(|e| format!("Invalid plan JSON: {}", e))?;
        plan.validate()?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "maandag": {
            "ontbijt": [{"name": "Havermout", "amount": 60}, {"name": "Ei", "amount": 2, "unit": "stuks"}],
            "diner": [{"name": "Kipfilet", "amount": 150, "unit": "gram"}],
            "notities": "ignored",
            "dailyTotals": {"calories": 1800, "protein": 120}
        },
        "dinsdag": {},
        "woensdag": {"lunch": []}
    }"#;

    #[test]
    fn test_deserialize_preserves_day_order() {
        let plan = WeeklyPlan::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = plan.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["maandag", "dinsdag", "woensdag"]);
    }

    #[test]
    fn test_meals_iterate_in_processing_order() {
        let plan = WeeklyPlan::from_json(SAMPLE).unwrap();
        let maandag = plan.get("maandag").unwrap();
        let types: Vec<MealType> = maandag.meals.iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec![MealType::Ontbijt, MealType::Diner]);
        assert_eq!(maandag.meals.ontbijt.as_ref().unwrap()[0].unit, MealUnit::Gram);
        assert_eq!(maandag.meals.ontbijt.as_ref().unwrap()[1].unit, MealUnit::Stuks);
        assert_eq!(maandag.daily_totals.unwrap().calories, Some(1800.0));
    }

    #[test]
    fn test_has_meal_data() {
        let plan = WeeklyPlan::from_json(SAMPLE).unwrap();
        assert!(plan.has_meal_data());

        let empty = WeeklyPlan::from_json(r#"{"maandag": {}, "dinsdag": {"lunch": []}}"#).unwrap();
        assert!(!empty.has_meal_data());
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let err = WeeklyPlan::from_json(r#"{"maandag": {"lunch": [{"name": "Rijst", "amount": 0}]}}"#)
            .unwrap_err();
        assert!(err.contains("amount must be greater than 0"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(WeeklyPlan::from_json(r#"["maandag"]"#).is_err());
        assert!(WeeklyPlan::from_json(r#"{"maandag": {"lunch": [{"amount": 10}]}}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trips_order() {
        let plan = WeeklyPlan::from_json(SAMPLE).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let maandag = json.find("maandag").unwrap();
        let dinsdag = json.find("dinsdag").unwrap();
        assert!(maandag < dinsdag);
        assert!(!json.contains("notities"));
    }
}
