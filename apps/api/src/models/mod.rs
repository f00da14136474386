pub mod meal;
pub mod profile;
pub mod progress;
pub mod recipe;
pub mod user;
