use serde::Serialize;

use crate::models::profile::{
    ActivityLevel, Gender, Goal, Hydration, Protein, Restriction, Routine, SleepQuality,
    StressLevel,
};
use crate::quiz::engine::{QuizStep, StepKind};

#[derive(Debug, Clone, Serialize)]
pub struct OptionSchema {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

/// One quiz step as the client renders it.
#[derive(Debug, Clone, Serialize)]
pub struct StepSchema {
    pub number: u8,
    pub key: QuizStep,
    pub kind: StepKind,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSchema>,
}

/// Suggested tags for the free-form habits step.
const HABIT_SUGGESTIONS: &[(&str, &str)] = &[
    ("sugar", "🍬 Consumo frequente de doces"),
    ("processed", "🍟 Alimentos ultraprocessados"),
    ("soda", "🥤 Refrigerantes"),
    ("skip_breakfast", "⏭️ Pula o café da manhã"),
    ("late_dinner", "🌙 Janta tarde"),
    ("snacking", "🍪 Belisca entre as refeições"),
];

fn options<T>(
    all: &[T],
    key: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> Vec<OptionSchema> {
    all.iter()
        .map(|item| OptionSchema {
            key: key(item),
            label: label(item),
        })
        .collect()
}

fn step_options(step: QuizStep) -> Vec<OptionSchema> {
    match step {
        QuizStep::Goal => options(Goal::ALL, Goal::key, Goal::label),
        QuizStep::PhysicalData => Vec::new(),
        QuizStep::ActivityLevel => options(ActivityLevel::ALL, ActivityLevel::key, ActivityLevel::label),
        QuizStep::StressLevel => options(StressLevel::ALL, StressLevel::key, StressLevel::label),
        QuizStep::SleepQuality => options(SleepQuality::ALL, SleepQuality::key, SleepQuality::label),
        QuizStep::Hydration => options(Hydration::ALL, Hydration::key, Hydration::label),
        QuizStep::CurrentHabits => HABIT_SUGGESTIONS
            .iter()
            .map(|&(key, label)| OptionSchema { key, label })
            .collect(),
        QuizStep::Proteins => options(Protein::ALL, Protein::key, Protein::label),
        QuizStep::Restrictions => options(Restriction::ALL, Restriction::key, Restriction::label),
        QuizStep::Routine => options(Routine::ALL, Routine::key, Routine::label),
    }
}

fn step_fields(step: QuizStep) -> Vec<FieldSchema> {
    if step != QuizStep::PhysicalData {
        return Vec::new();
    }
    let field = |name, label, required| FieldSchema {
        name,
        label,
        required,
        options: Vec::new(),
    };

    vec![
        field("age", "Idade", true),
        FieldSchema {
            options: options(Gender::ALL, Gender::key, Gender::label),
            ..field("gender", "Sexo", true)
        },
        field("weight", "Peso atual (kg)", true),
        field("height", "Altura (cm)", true),
        field("goalWeight", "Peso desejado (kg)", false),
    ]
}

/// The ordered quiz definition.
pub fn quiz_schema() -> Vec<StepSchema> {
    QuizStep::ORDER
        .iter()
        .map(|&step| StepSchema {
            number: step.number(),
            key: step,
            kind: step.kind(),
            title: step.title(),
            options: step_options(step),
            fields: step_fields(step),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::engine::TOTAL_STEPS;

    #[test]
    fn test_schema_lists_every_step_in_order() {
        let schema = quiz_schema();
        assert_eq!(schema.len(), TOTAL_STEPS as usize);
        for (i, step) in schema.iter().enumerate() {
            assert_eq!(step.number as usize, i + 1);
        }
    }

    #[test]
    fn test_choice_steps_have_options_and_physical_step_has_fields() {
        for step in quiz_schema() {
            match step.kind {
                StepKind::Composite => {
                    assert!(step.options.is_empty());
                    assert_eq!(step.fields.len(), 5);
                }
                _ => assert!(!step.options.is_empty(), "{:?} has no options", step.key),
            }
        }
    }

    #[test]
    fn test_restrictions_include_none() {
        let schema = quiz_schema();
        let restrictions = &schema[8];
        assert_eq!(restrictions.key, QuizStep::Restrictions);
        assert!(restrictions.options.iter().any(|o| o.key == "none"));
    }
}
