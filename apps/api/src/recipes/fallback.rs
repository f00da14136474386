//! Static recipes served when the AI generator is unavailable.

use chrono::Timelike;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::recipe::{Recipe, RecipeCategory};

struct StaticRecipe {
    name: &'static str,
    time: &'static str,
    calories: &'static str,
    protein: &'static str,
    ingredients: &'static [&'static str],
    steps: &'static [&'static str],
    tip: &'static str,
}

impl StaticRecipe {
    fn to_recipe(&self, category: RecipeCategory) -> Recipe {
        Recipe {
            name: self.name.to_string(),
            time: self.time.to_string(),
            calories: self.calories.to_string(),
            protein: self.protein.to_string(),
            ingredients: self.ingredients.iter().map(|s| s.to_string()).collect(),
            steps: self.steps.iter().map(|s| s.to_string()).collect(),
            tip: self.tip.to_string(),
            meal_type: Some(category),
        }
    }
}

const BREAKFAST: &[StaticRecipe] = &[
    StaticRecipe {
        name: "Ovos Mexidos com Bacon e Queijo",
        time: "15min",
        calories: "450kcal",
        protein: "28g",
        ingredients: &[
            "3 ovos caipiras",
            "4 fatias de bacon",
            "50g de queijo minas",
            "1 colher de manteiga",
            "Sal e pimenta a gosto",
        ],
        steps: &[
            "Frite o bacon em frigideira até ficar crocante",
            "Bata os ovos com sal e pimenta",
            "Na gordura do bacon, adicione a manteiga",
            "Despeje os ovos e mexa delicadamente",
            "Adicione queijo e bacon picado",
            "Sirva quando os ovos estiverem cremosos",
        ],
        tip: "Os ovos caipiras são mais nutritivos e ricos em ômega-3!",
    },
    StaticRecipe {
        name: "Iogurte Natural com Frutas e Mel",
        time: "5min",
        calories: "280kcal",
        protein: "15g",
        ingredients: &[
            "200g de iogurte natural integral",
            "1/2 banana madura",
            "5 morangos frescos",
            "1 colher de mel puro",
            "Canela em pó a gosto",
        ],
        steps: &[
            "Coloque o iogurte em uma tigela",
            "Corte as frutas em pedaços",
            "Disponha as frutas sobre o iogurte",
            "Regue com mel puro de abelha",
            "Finalize com canela em pó",
        ],
        tip: "O mel é o único adoçante permitido na Dieta da Selva - use com moderação!",
    },
];

const LUNCH: &[StaticRecipe] = &[
    StaticRecipe {
        name: "Bife de Picanha Grelhado na Manteiga",
        time: "20min",
        calories: "580kcal",
        protein: "52g",
        ingredients: &[
            "300g de picanha",
            "2 colheres de manteiga",
            "Sal grosso a gosto",
            "Pimenta do reino moída",
            "Alho picado (opcional)",
        ],
        steps: &[
            "Retire a carne da geladeira 30 min antes",
            "Tempere generosamente com sal grosso",
            "Aqueça a frigideira com manteiga",
            "Grelhe 4-5 min de cada lado (ao ponto)",
            "Adicione mais manteiga e alho no final",
            "Deixe descansar 5 min antes de cortar",
        ],
        tip: "A gordura da picanha é saudável e saborosa - não retire!",
    },
    StaticRecipe {
        name: "Frango Assado com Ervas",
        time: "45min",
        calories: "420kcal",
        protein: "48g",
        ingredients: &[
            "2 sobrecoxas de frango com pele",
            "2 colheres de manteiga derretida",
            "Alecrim e tomilho frescos",
            "4 dentes de alho",
            "Sal e pimenta a gosto",
        ],
        steps: &[
            "Tempere o frango com sal, pimenta e ervas",
            "Espalhe manteiga por toda a pele",
            "Disponha os alhos ao redor",
            "Asse a 200°C por 40 minutos",
            "Regue com o molho algumas vezes",
            "Sirva com a pele crocante",
        ],
        tip: "A pele do frango é rica em colágeno - não descarte!",
    },
];

const SNACK: &[StaticRecipe] = &[
    StaticRecipe {
        name: "Queijo com Frutas e Mel",
        time: "5min",
        calories: "320kcal",
        protein: "18g",
        ingredients: &[
            "100g de queijo coalho ou minas",
            "1 maçã pequena fatiada",
            "1 colher de mel",
            "Canela em pó",
        ],
        steps: &[
            "Corte o queijo em cubos ou fatias",
            "Fatie a maçã em lâminas finas",
            "Disponha alternando queijo e maçã",
            "Regue com mel",
            "Polvilhe canela por cima",
        ],
        tip: "Combinação perfeita de proteína, gordura e doce natural!",
    },
    StaticRecipe {
        name: "Ovos Cozidos com Manteiga",
        time: "12min",
        calories: "220kcal",
        protein: "14g",
        ingredients: &[
            "2 ovos caipiras",
            "1 colher de manteiga",
            "Sal e pimenta a gosto",
            "Ervas finas (opcional)",
        ],
        steps: &[
            "Cozinhe os ovos por 8-10 minutos",
            "Coloque em água gelada",
            "Descasque e corte ao meio",
            "Adicione uma noz de manteiga em cada",
            "Tempere com sal e pimenta",
        ],
        tip: "Ovos são o alimento mais completo da natureza!",
    },
];

const DINNER: &[StaticRecipe] = &[
    StaticRecipe {
        name: "Omelete Recheada de Queijo",
        time: "15min",
        calories: "420kcal",
        protein: "32g",
        ingredients: &[
            "3 ovos",
            "60g de queijo muçarela",
            "1 colher de manteiga",
            "Sal e pimenta a gosto",
            "Orégano a gosto",
        ],
        steps: &[
            "Bata os ovos com sal e pimenta",
            "Derreta a manteiga em frigideira média",
            "Despeje os ovos e deixe cozinhar",
            "Quando firmar embaixo, adicione queijo",
            "Dobre ao meio",
            "Sirva com orégano por cima",
        ],
        tip: "Jantar leve e proteico - ideal para boa noite de sono!",
    },
    StaticRecipe {
        name: "Salmão Grelhado com Limão",
        time: "18min",
        calories: "380kcal",
        protein: "42g",
        ingredients: &[
            "200g de filé de salmão",
            "Suco de 1 limão",
            "2 colheres de manteiga",
            "Sal e pimenta a gosto",
            "Endro fresco",
        ],
        steps: &[
            "Tempere o salmão com sal e limão",
            "Aqueça a frigideira com manteiga",
            "Grelhe 4 minutos de cada lado",
            "Adicione mais manteiga derretida",
            "Finalize com endro fresco",
        ],
        tip: "Salmão é rico em ômega-3 - excelente para o cérebro!",
    },
];

fn recipes_for(category: RecipeCategory) -> &'static [StaticRecipe] {
    match category {
        RecipeCategory::Breakfast => BREAKFAST,
        RecipeCategory::Lunch => LUNCH,
        RecipeCategory::Snack => SNACK,
        RecipeCategory::Dinner => DINNER,
    }
}

/// Meal category for a local hour of day (0–23).
pub fn category_for_hour(hour: u32) -> RecipeCategory {
    match hour {
        5..=9 => RecipeCategory::Breakfast,
        10..=13 => RecipeCategory::Lunch,
        14..=17 => RecipeCategory::Snack,
        _ => RecipeCategory::Dinner,
    }
}

/// One of the static recipes for the category, chosen with `rng`.
pub fn pick<R: Rng + ?Sized>(category: RecipeCategory, rng: &mut R) -> Recipe {
    let candidates = recipes_for(category);
    // Every category table is non-empty.
    let chosen = candidates.choose(rng).unwrap_or(&candidates[0]);
    chosen.to_recipe(category)
}

/// The fallback recipe for the current local time.
pub fn fallback_recipe() -> Recipe {
    let hour = chrono::Local::now().hour();
    pick(category_for_hour(hour), &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hour_buckets() {
        let expect = |hours: std::ops::RangeInclusive<u32>, category| {
            for hour in hours {
                assert_eq!(category_for_hour(hour), category, "hour {hour}");
            }
        };
        expect(0..=4, RecipeCategory::Dinner);
        expect(5..=9, RecipeCategory::Breakfast);
        expect(10..=13, RecipeCategory::Lunch);
        expect(14..=17, RecipeCategory::Snack);
        expect(18..=23, RecipeCategory::Dinner);
    }

    #[test]
    fn test_pick_returns_a_recipe_of_the_category() {
        let mut rng = StdRng::seed_from_u64(7);
        for category in [
            RecipeCategory::Breakfast,
            RecipeCategory::Lunch,
            RecipeCategory::Snack,
            RecipeCategory::Dinner,
        ] {
            let names: Vec<&str> = recipes_for(category).iter().map(|r| r.name).collect();
            assert_eq!(names.len(), 2);
            for _ in 0..10 {
                let recipe = pick(category, &mut rng);
                assert!(names.contains(&recipe.name.as_str()));
                assert_eq!(recipe.meal_type, Some(category));
                assert!(!recipe.ingredients.is_empty());
                assert!(!recipe.steps.is_empty());
            }
        }
    }

    #[test]
    fn test_both_recipes_are_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked: std::collections::HashSet<String> = (0..50)
            .map(|_| pick(RecipeCategory::Lunch, &mut rng).name)
            .collect();
        assert_eq!(picked.len(), 2);
    }
}
