use serde::Serialize;

use crate::models::profile::Goal;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub slot: &'static str,
    pub icon: &'static str,
}

const fn s(name: &'static str, slot: &'static str, icon: &'static str) -> Suggestion {
    Suggestion { name, slot, icon }
}

/// Three meal ideas for the goal. Users without a goal get the weight-loss set.
pub fn suggestions_for(goal: Option<Goal>) -> [Suggestion; 3] {
    match goal.unwrap_or(Goal::LoseWeight) {
        Goal::LoseWeight => [
            s("Omelete de Ervas com Queijo", "Manhã", "🍳"),
            s("Peito de Frango Grelhado com Brócolis", "Almoço", "🍗"),
            s("Filé de Peixe ao Forno com Azeite", "Jantar", "🐟"),
        ],
        Goal::GainMuscle => [
            s("Ovos Mexidos com Bacon e Queijo", "Manhã", "🥓"),
            s("Picanha na Manteiga com Ovos Fritos", "Almoço", "🥩"),
            s("Sobrecoxa de Frango Assada", "Jantar", "🍗"),
        ],
        Goal::Health => [
            s("Iogurte Natural com Frutas e Mel", "Manhã", "🍯"),
            s("Salmão Grelhado com Aspargos", "Almoço", "🐟"),
            s("Mix de Queijos e Oleaginosas", "Lanche", "🧀"),
        ],
        Goal::Energy => [
            s("Ovos Poché com Abacate", "Manhã", "🥑"),
            s("Bife de Fígado com Cebola", "Almoço", "🥩"),
            s("Caldo de Carne com Legumes Selva", "Jantar", "🥣"),
        ],
    }
}
