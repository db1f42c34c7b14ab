use crate::food::FoodItem;

/// Stand-in result returned when the vision call fails.
pub fn placeholder_food_items() -> Vec<FoodItem> {
    vec![
        FoodItem::new("Apple", 95.0, 0.5, 25.0, 0.3),
        FoodItem::new("Pizza Slice", 285.0, 12.0, 35.0, 10.0),
    ]
}
