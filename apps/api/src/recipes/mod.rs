// Recipes: personalized AI generation with a static fallback, ingredient
// recognition from photos, the saved-recipe book and goal suggestions.
// All LLM calls go through llm_client.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod preferences;
pub mod prompts;
pub mod suggestions;
