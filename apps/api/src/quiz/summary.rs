use serde::Serialize;

use crate::models::profile::{bmi_category, UserProfile};

const UNDEFINED: &str = "Não definido";

/// Display texts shown on the quiz result screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub goal: String,
    pub physical_data: String,
    pub bmi: String,
    pub weight_goal: String,
    pub activity_level: String,
    pub stress_level: String,
    pub sleep_quality: String,
    pub hydration: String,
    pub routine: String,
    pub proteins: String,
}

pub fn summarize(profile: &UserProfile) -> QuizSummary {
    let label = |l: Option<&'static str>| l.unwrap_or(UNDEFINED).to_string();

    QuizSummary {
        goal: label(profile.goal.map(|g| g.label())),
        physical_data: physical_data_text(profile),
        bmi: match profile.bmi {
            Some(bmi) => format!("{bmi:.1} ({})", bmi_category(bmi)),
            None => UNDEFINED.to_string(),
        },
        weight_goal: weight_goal_text(profile.weight, profile.goal_weight),
        activity_level: label(profile.activity_level.map(|a| a.label())),
        stress_level: label(profile.stress_level.map(|s| s.label())),
        sleep_quality: label(profile.sleep_quality.map(|s| s.label())),
        hydration: label(profile.hydration.map(|h| h.label())),
        routine: label(profile.routine.map(|r| r.label())),
        proteins: if profile.favorite_proteins.is_empty() {
            "Todas as proteínas".to_string()
        } else {
            profile
                .favorite_proteins
                .iter()
                .map(|p| p.label())
                .collect::<Vec<_>>()
                .join(", ")
        },
    }
}

fn physical_data_text(profile: &UserProfile) -> String {
    match (profile.age, profile.gender, profile.height) {
        (Some(age), Some(gender), Some(height)) => {
            format!("{age} anos, {}, {height}cm", gender.label())
        }
        _ => UNDEFINED.to_string(),
    }
}

pub fn weight_goal_text(weight: Option<f64>, goal_weight: Option<f64>) -> String {
    let Some(weight) = weight else {
        return UNDEFINED.to_string();
    };
    let Some(goal) = goal_weight else {
        return format!("Peso atual: {}kg", kg(weight));
    };

    let diff = goal - weight;
    if diff.abs() < 0.05 {
        format!("Manter {}kg", kg(weight))
    } else if diff < 0.0 {
        format!("{}kg → {}kg (-{:.1}kg)", kg(weight), kg(goal), -diff)
    } else {
        format!("{}kg → {}kg (+{:.1}kg)", kg(weight), kg(goal), diff)
    }
}

/// Weight without a trailing ".0".
fn kg(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Gender, Goal, Protein};

    #[test]
    fn test_weight_goal_texts() {
        assert_eq!(weight_goal_text(Some(80.0), Some(75.0)), "80kg → 75kg (-5.0kg)");
        assert_eq!(weight_goal_text(Some(60.0), Some(65.5)), "60kg → 65.5kg (+5.5kg)");
        assert_eq!(weight_goal_text(Some(72.3), Some(72.3)), "Manter 72.3kg");
        assert_eq!(weight_goal_text(Some(72.0), None), "Peso atual: 72kg");
        assert_eq!(weight_goal_text(None, Some(70.0)), "Não definido");
    }

    #[test]
    fn test_summary_of_full_profile() {
        let profile = UserProfile {
            goal: Some(Goal::GainMuscle),
            age: Some(34),
            gender: Some(Gender::Male),
            weight: Some(80.0),
            height: Some(178),
            goal_weight: Some(85.0),
            bmi: Some(25.2),
            favorite_proteins: vec![Protein::Beef, Protein::Eggs],
            ..Default::default()
        };
        let summary = summarize(&profile);
        assert_eq!(summary.goal, "Ganhar massa muscular");
        assert_eq!(summary.physical_data, "34 anos, Masculino, 178cm");
        assert_eq!(summary.bmi, "25.2 (Sobrepeso)");
        assert_eq!(summary.weight_goal, "80kg → 85kg (+5.0kg)");
        assert_eq!(summary.proteins, "Carne bovina, Ovos");
        assert_eq!(summary.routine, "Não definido");
    }

    #[test]
    fn test_no_proteins_means_all() {
        let summary = summarize(&UserProfile::default());
        assert_eq!(summary.proteins, "Todas as proteínas");
        assert_eq!(summary.physical_data, "Não definido");
        assert_eq!(summary.bmi, "Não definido");
    }
}
