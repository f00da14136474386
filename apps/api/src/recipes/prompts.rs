// Prompts for recipe generation and ingredient recognition.
// All LLM calls go through llm_client; nothing here talks to the provider.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::CallOptions;

pub const RECIPE_OPTIONS: CallOptions = CallOptions {
    temperature: 0.8,
    max_tokens: 1000,
};

pub const VISION_OPTIONS: CallOptions = CallOptions {
    temperature: 0.2,
    max_tokens: 200,
};

const RECIPE_SYSTEM_BASE: &str = "Você é um nutricionista especialista em dietas low-carb, carnívora e Protocolo Selva.
Crie receitas saudáveis focadas em:
- Proteínas de alta qualidade (carnes, peixes, ovos)
- Gorduras saudáveis (azeite, abacate, castanhas)
- Baixo teor de carboidratos
- Sem açúcares refinados ou ultraprocessados

Responda SEMPRE em formato JSON válido com a seguinte estrutura:
{
  \"name\": \"Nome da receita\",
  \"time\": \"tempo de preparo (ex: 25min)\",
  \"calories\": \"calorias aproximadas (ex: 520kcal)\",
  \"protein\": \"proteína aproximada (ex: 48g)\",
  \"ingredients\": [\"ingrediente 1\", \"ingrediente 2\", ...],
  \"steps\": [\"passo 1\", \"passo 2\", ...],
  \"tip\": \"dica nutricional ou de preparo\"
}";

pub fn recipe_system() -> String {
    format!("{RECIPE_SYSTEM_BASE}\n{JSON_ONLY_INSTRUCTION}")
}

pub fn recipe_prompt(ingredients: &str, preferences: &str) -> String {
    let preferences = preferences.trim();
    let preferences_line = if preferences.is_empty() {
        String::new()
    } else {
        format!("Preferências: {preferences}")
    };
    format!(
        "Crie uma receita deliciosa e saudável usando principalmente estes ingredientes: {ingredients}\n\
         {preferences_line}\n\n\
         Lembre-se de focar em proteínas e gorduras boas, mantendo baixo carboidrato."
    )
}

pub const VISION_SYSTEM: &str = "Você é um assistente que identifica ingredientes em fotos. \
    Liste apenas os ingredientes que você consegue identificar, separados por vírgula. Seja conciso.";

pub const VISION_PROMPT: &str = "Quais ingredientes você consegue identificar nesta imagem?";
