use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recognized food entry with its estimated nutrition.
///
/// `name` and `calories` are whatever the model sent; `None` means it sent nothing usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "item_name")]
    pub name: Option<String>,
    #[serde(rename = "total_calories")]
    pub calories: Option<f64>,
    #[serde(rename = "total_protein", default)]
    pub protein: f64,
    #[serde(rename = "total_carbs", default)]
    pub carbs: f64,
    #[serde(rename = "total_fats", default)]
    pub fats: f64,
}

impl FoodItem {
    pub fn new(
        name: impl Into<String>,
        calories: f64,
        protein: f64,
        carbs: f64,
        fats: f64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            calories: Some(calories),
            protein,
            carbs,
            fats,
        }
    }

    /// Builds an item from one entry of the model's `items` array.
    ///
    /// `item_name` and `total_calories` pass through without defaults. The macro
    /// fields fall back to 0 when missing or falsy (null, 0, false, "").
    pub fn from_model_entry(entry: &Value) -> Self {
        let name = match entry.get("item_name") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Self {
            name,
            calories: entry.get("total_calories").and_then(as_number),
            protein: macro_or_zero(entry.get("total_protein")),
            carbs: macro_or_zero(entry.get("total_carbs")),
            fats: macro_or_zero(entry.get("total_fats")),
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn macro_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(as_number).unwrap_or(0.0)
}
