//! Turns a profile plus per-request choices into the free-text preference
//! string sent with a recipe request.
//!
//! Clause order is fixed and every clause ends with ". ", so the same inputs
//! always produce byte-identical output.

use std::fmt::Write;

use crate::models::profile::{
    ActivityLevel, Goal, Protein, Restriction, SleepQuality, StressLevel, UserProfile,
};

/// Per-request choices from the recipe form. `"any"` or blank means no preference.
#[derive(Debug, Clone, Default)]
pub struct PreferenceOverrides {
    pub meal_type: Option<String>,
    pub cook_time: Option<String>,
}

fn chosen(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "any")
}

fn goal_directive(goal: Goal) -> &'static str {
    match goal {
        Goal::LoseWeight => {
            "FOCO EM EMAGRECIMENTO - receita com menos calorias, mais proteína e saciedade"
        }
        Goal::GainMuscle => "FOCO EM GANHO DE MASSA - receita rica em proteína e calorias adequadas",
        Goal::Health => "FOCO EM SAÚDE - receita nutritiva e equilibrada",
        Goal::Energy => "FOCO EM ENERGIA - receita que proporciona disposição prolongada",
    }
}

fn protein_name(protein: Protein) -> &'static str {
    match protein {
        Protein::Beef => "carne bovina",
        Protein::Chicken => "frango",
        Protein::Pork => "porco/bacon",
        Protein::Fish => "peixes",
        Protein::Eggs => "ovos",
        Protein::Cheese => "queijos",
    }
}

fn restriction_phrase(restriction: Restriction) -> Option<&'static str> {
    match restriction {
        Restriction::Lactose => Some("intolerância à lactose (EVITAR laticínios)"),
        Restriction::Gluten => Some("intolerância ao glúten (EVITAR glúten)"),
        Restriction::Seafood => Some("alergia a frutos do mar (EVITAR peixes e frutos do mar)"),
        Restriction::Pork => Some("não come carne de porco (EVITAR porco e bacon)"),
        Restriction::Eggs => Some("alergia a ovos (EVITAR ovos)"),
        Restriction::NoRestriction => None,
    }
}

/// Builds the preference string. Total: never fails, empty when nothing applies.
pub fn compile(profile: Option<&UserProfile>, overrides: &PreferenceOverrides) -> String {
    let mut out = String::new();

    if let Some(meal_type) = chosen(&overrides.meal_type) {
        let _ = write!(out, "Tipo de refeição: {meal_type}. ");
    }
    if let Some(cook_time) = chosen(&overrides.cook_time) {
        let _ = write!(out, "Tempo máximo de preparo: {cook_time} minutos. ");
    }

    let Some(profile) = profile else {
        return out;
    };

    if let Some(goal) = profile.goal {
        let _ = write!(out, "{}. ", goal_directive(goal));
    }

    if !profile.favorite_proteins.is_empty() {
        let names: Vec<&str> = profile
            .favorite_proteins
            .iter()
            .map(|p| protein_name(*p))
            .collect();
        let _ = write!(out, "Proteínas preferidas: {}. ", names.join(", "));
    }

    let restrictions: Vec<&str> = profile
        .restrictions
        .iter()
        .filter_map(|r| restriction_phrase(*r))
        .collect();
    if !restrictions.is_empty() {
        let _ = write!(out, "RESTRIÇÕES IMPORTANTES: {}. ", restrictions.join("; "));
    }

    if matches!(
        profile.stress_level,
        Some(StressLevel::High | StressLevel::VeryHigh)
    ) {
        out.push_str("Pessoa com ALTO ESTRESSE - incluir ingredientes relaxantes e nutritivos. ");
    }

    if matches!(
        profile.sleep_quality,
        Some(SleepQuality::Poor | SleepQuality::Regular)
    ) {
        out.push_str(
            "Qualidade de sono ruim - evitar cafeína, preferir alimentos que ajudam no sono. ",
        );
    }

    if matches!(
        profile.activity_level,
        Some(ActivityLevel::Active | ActivityLevel::Athlete)
    ) {
        out.push_str("Pessoa muito ativa - receita com mais proteína para recuperação muscular. ");
    }

    out
}
