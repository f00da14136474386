// Meal log and the daily meal streak.

pub mod handlers;
pub mod streak;
