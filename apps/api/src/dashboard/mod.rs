//! Dashboard overview: time in the protocol, activity counters and the tip of the day.

pub mod handlers;

use chrono::{Datelike, NaiveDate};

pub const DAILY_TIPS: [&str; 10] = [
    "Priorize proteínas de alta qualidade em cada refeição. Carne, peixe e ovos são seus melhores aliados!",
    "Gorduras saudáveis como azeite, abacate e castanhas ajudam seu corpo a absorver vitaminas essenciais.",
    "Evite carboidratos processados. Prefira legumes e vegetais como fonte de fibras e nutrientes.",
    "Hidrate-se! Beba pelo menos 2 litros de água por dia. Chás sem açúcar também contam.",
    "O jejum intermitente pode potencializar seus resultados. Comece com 12 horas e vá aumentando.",
    "Durma bem! O sono de qualidade é essencial para a recuperação e perda de gordura.",
    "Carnes de animais criados a pasto são mais nutritivas. Sempre que possível, escolha qualidade.",
    "Tempere suas refeições com ervas e especiarias naturais. Elas têm propriedades anti-inflamatórias!",
    "Ovos são superalimentos! Rico em proteínas, vitaminas e gorduras boas. Coma a gema também!",
    "Cozinhe em casa sempre que possível. Você controla os ingredientes e economiza dinheiro.",
];

/// Tip for `day`, rotating by day of the year (1 January is day 1).
pub fn daily_tip(day: NaiveDate) -> &'static str {
    DAILY_TIPS[day.ordinal() as usize % DAILY_TIPS.len()]
}

/// Calendar days since sign-up, counting the sign-up day itself. Never below 1.
pub fn days_in_protocol(joined: NaiveDate, today: NaiveDate) -> i64 {
    ((today - joined).num_days() + 1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_daily_tip_rotates_by_ordinal() {
        // 1 January is ordinal 1.
        assert_eq!(daily_tip(day("2026-01-01")), DAILY_TIPS[1]);
        assert_eq!(daily_tip(day("2026-01-10")), DAILY_TIPS[0]);
        assert_eq!(daily_tip(day("2026-01-11")), DAILY_TIPS[1]);
    }

    #[test]
    fn test_days_in_protocol_counts_first_day() {
        assert_eq!(days_in_protocol(day("2026-04-01"), day("2026-04-01")), 1);
        assert_eq!(days_in_protocol(day("2026-04-01"), day("2026-04-10")), 10);
    }

    #[test]
    fn test_days_in_protocol_never_below_one() {
        assert_eq!(days_in_protocol(day("2026-04-05"), day("2026-04-01")), 1);
    }
}
