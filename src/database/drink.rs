use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One recipe component. `parts` is the relative share in the pour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// A drink on the menu. Recipe is stored as JSON text in the drinks table
/// and always holds a list, even for single-ingredient drinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// Public representation: ingredient colors and proportions only.
    pub fn short(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "recipe": self.recipe.iter().map(|i| json!({
                "color": i.color,
                "parts": i.parts,
            })).collect::<Vec<_>>(),
        })
    }

    /// Privileged representation: the full recipe, ingredient names included.
    pub fn long(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "recipe": self.recipe,
        })
    }
}

/// Normalize a recipe payload into an ingredient list. A single ingredient
/// object is accepted and wrapped into a one-element list; anything that is
/// neither an object nor an array of objects is rejected.
pub fn normalize_recipe(value: Value) -> Result<Vec<Ingredient>, serde_json::Error> {
    let as_list = match value {
        Value::Object(obj) => Value::Array(vec![Value::Object(obj)]),
        other => other,
    };
    serde_json::from_value(as_list)
}
