use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a closed set of quiz options with its wire key and display label.
///
/// Every option enum gets `ALL`, `key()`, `label()` and `from_key()`, and
/// serializes as its key.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $key)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key.trim() {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

choice_enum! {
    pub enum Goal {
        LoseWeight => ("lose_weight", "Perder peso"),
        GainMuscle => ("gain_muscle", "Ganhar massa muscular"),
        Health => ("health", "Melhorar a saúde"),
        Energy => ("energy", "Mais energia e disposição"),
    }
}

impl Goal {
    /// Accepts both quiz keys and the older profile-form keys (`lose`, `gain`, `maintain`).
    pub fn from_any_key(key: &str) -> Option<Self> {
        Goal::from_key(key).or(match key.trim() {
            "lose" => Some(Goal::LoseWeight),
            "gain" => Some(Goal::GainMuscle),
            "maintain" => Some(Goal::Health),
            _ => None,
        })
    }
}

choice_enum! {
    pub enum Gender {
        Male => ("male", "Masculino"),
        Female => ("female", "Feminino"),
    }
}

choice_enum! {
    pub enum ActivityLevel {
        Sedentary => ("sedentary", "🛋️ Sedentário"),
        Light => ("light", "🚶 Leve"),
        Moderate => ("moderate", "🏃 Moderado"),
        Active => ("active", "💪 Ativo"),
        Athlete => ("athlete", "🏆 Atleta"),
    }
}

choice_enum! {
    pub enum StressLevel {
        Low => ("low", "😌 Baixo"),
        Moderate => ("moderate", "😐 Moderado"),
        High => ("high", "😓 Alto"),
        VeryHigh => ("very_high", "🤯 Muito alto"),
    }
}

choice_enum! {
    pub enum SleepQuality {
        Excellent => ("excellent", "⭐ Excelente"),
        Good => ("good", "😊 Boa"),
        Regular => ("regular", "😕 Regular"),
        Poor => ("poor", "😫 Ruim"),
    }
}

choice_enum! {
    pub enum Hydration {
        Low => ("low", "🥤 Menos de 1L"),
        Moderate => ("moderate", "💧 1-1.5L"),
        Good => ("good", "💦 1.5-2L"),
        Excellent => ("excellent", "🌊 Mais de 2L"),
    }
}

choice_enum! {
    pub enum Protein {
        Beef => ("beef", "Carne bovina"),
        Chicken => ("chicken", "Frango"),
        Pork => ("pork", "Porco/Bacon"),
        Fish => ("fish", "Peixes"),
        Eggs => ("eggs", "Ovos"),
        Cheese => ("cheese", "Queijos"),
    }
}

choice_enum! {
    pub enum Restriction {
        Lactose => ("lactose", "Intolerância à lactose"),
        Gluten => ("gluten", "Intolerância ao glúten"),
        Seafood => ("seafood", "Alergia a frutos do mar"),
        Pork => ("pork", "Não come carne de porco"),
        Eggs => ("eggs", "Alergia a ovos"),
        NoRestriction => ("none", "Nenhuma restrição"),
    }
}

choice_enum! {
    pub enum Routine {
        Regular => ("regular", "Horários regulares"),
        Flexible => ("flexible", "Flexível"),
        Intermittent => ("intermittent", "Jejum intermitente"),
        Frequent => ("frequent", "Várias refeições ao dia"),
    }
}

/// The canonical per-user profile.
///
/// The quiz fills every field; profile-form edits and the server-side
/// `profiles` row only carry the physical fields, so everything is optional
/// except the two flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<SleepQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration: Option<Hydration>,
    #[serde(default)]
    pub current_habits: Vec<String>,
    #[serde(default)]
    pub favorite_proteins: Vec<Protein>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<Routine>,
    #[serde(default)]
    pub quiz_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Recomputes `bmi` from the current weight and height, clearing it when either is unknown.
    pub fn refresh_bmi(&mut self) {
        self.bmi = match (self.weight, self.height) {
            (Some(weight), Some(height)) => compute_bmi(weight, height),
            _ => None,
        };
    }
}

/// `weight / (height/100)^2`, rounded to one decimal. `None` for non-positive inputs.
pub fn compute_bmi(weight_kg: f64, height_cm: u32) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm == 0 {
        return None;
    }
    let height_m = f64::from(height_cm) / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// Fixed BMI bands.
pub fn bmi_category(bmi: f64) -> &'static str {
    match bmi {
        b if b < 18.5 => "Abaixo do peso",
        b if b < 25.0 => "Peso normal",
        b if b < 30.0 => "Sobrepeso",
        b if b < 35.0 => "Obesidade I",
        b if b < 40.0 => "Obesidade II",
        _ => "Obesidade III",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_for_80kg_178cm() {
        let bmi = compute_bmi(80.0, 178).unwrap();
        assert!((bmi - 25.2).abs() < 0.05, "got {bmi}");
        assert_eq!(bmi_category(bmi), "Sobrepeso");
    }

    #[test]
    fn test_bmi_rejects_zero_height() {
        assert_eq!(compute_bmi(80.0, 0), None);
        assert_eq!(compute_bmi(0.0, 170), None);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(bmi_category(18.4), "Abaixo do peso");
        assert_eq!(bmi_category(18.5), "Peso normal");
        assert_eq!(bmi_category(24.9), "Peso normal");
        assert_eq!(bmi_category(25.0), "Sobrepeso");
        assert_eq!(bmi_category(30.0), "Obesidade I");
        assert_eq!(bmi_category(35.0), "Obesidade II");
        assert_eq!(bmi_category(40.0), "Obesidade III");
    }

    #[test]
    fn test_choice_keys_round_trip_through_serde() {
        let json = serde_json::to_string(&StressLevel::VeryHigh).unwrap();
        assert_eq!(json, r#""very_high""#);
        let back: StressLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StressLevel::VeryHigh);
        assert_eq!(StressLevel::from_key("very_high"), Some(StressLevel::VeryHigh));
        assert_eq!(StressLevel::from_key("extreme"), None);
    }

    #[test]
    fn test_legacy_goal_aliases() {
        assert_eq!(Goal::from_any_key("lose"), Some(Goal::LoseWeight));
        assert_eq!(Goal::from_any_key("gain"), Some(Goal::GainMuscle));
        assert_eq!(Goal::from_any_key("maintain"), Some(Goal::Health));
        assert_eq!(Goal::from_any_key("energy"), Some(Goal::Energy));
        assert_eq!(Goal::from_any_key("bulk"), None);
    }

    #[test]
    fn test_profile_json_uses_camel_case() {
        let profile = UserProfile {
            goal_weight: Some(75.0),
            quiz_completed: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["goalWeight"], 75.0);
        assert_eq!(value["quizCompleted"], true);
        assert!(value.get("bmi").is_none());
    }
}
