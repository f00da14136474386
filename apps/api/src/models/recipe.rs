use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Meal category a recipe is written for. Keys match the recipe generator's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeCategory {
    #[serde(rename = "cafe_da_manha")]
    Breakfast,
    #[serde(rename = "almoco")]
    Lunch,
    #[serde(rename = "lanche")]
    Snack,
    #[serde(rename = "jantar")]
    Dinner,
}

impl RecipeCategory {
    pub fn key(&self) -> &'static str {
        match self {
            RecipeCategory::Breakfast => "cafe_da_manha",
            RecipeCategory::Lunch => "almoco",
            RecipeCategory::Snack => "lanche",
            RecipeCategory::Dinner => "jantar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecipeCategory::Breakfast => "Café da Manhã",
            RecipeCategory::Lunch => "Almoço",
            RecipeCategory::Snack => "Lanche da Tarde",
            RecipeCategory::Dinner => "Jantar",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cafe_da_manha" => Some(RecipeCategory::Breakfast),
            "almoco" => Some(RecipeCategory::Lunch),
            "lanche" => Some(RecipeCategory::Snack),
            "jantar" => Some(RecipeCategory::Dinner),
            _ => None,
        }
    }
}

/// A recipe as produced by the generator or the static fallback table.
/// All nutrition fields are display strings ("25min", "520kcal", "48g").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<RecipeCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeRow {
    pub id: i64,
    pub name: String,
    pub time: String,
    pub calories: String,
    pub protein: String,
    pub ingredients: Json<Vec<String>>,
    pub steps: Json<Vec<String>>,
    pub tip: String,
    pub meal_type: Option<String>,
    pub saved_at: DateTime<Utc>,
}
