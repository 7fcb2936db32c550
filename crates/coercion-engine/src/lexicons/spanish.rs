//! Spanish lexicon for formal documents (DK/es)
//!
//! Used for court filings and correspondence written in Spanish. Patterns
//! anchor on a leading word boundary only, so inflected endings still match
//! (`amenaz` catches amenaza, amenazar, amenazó).

use crate::contradiction::ContradictionDefinition;
use crate::jurisdiction::{Jurisdiction, Language};
use crate::lexicon::{CategoryDefinition, LexiconDefinition, RuleDefinition};
use shared_types::{Category, Severity};

pub const GASLIGHTING: &[&str] = &[
    r"\b(no\s+recuerdo|nunca\s+dije|eso\s+no\s+pasó|estás\s+equivocad[ao]|te\s+lo\s+inventaste|estás\s+confundid[ao]|no\s+sucedió)",
    r"\b(negación|desmentir|contradecir\s+la\s+realidad)",
    r"\b(no\s+es\s+verdad|eso\s+no\s+es\s+cierto|mientes|mentiras)",
];

/// Money vocabulary proper; bare topic words are a separate low rule
pub const ECONOMIC_COERCION: &[&str] = &[
    r"\b(no\s+tienes\s+dinero|sin\s+dinero|dependes\s+de\s+mí|no\s+puedes\s+pagarlo)",
    r"\b(control\s+de\s+cuentas|acceso\s+al\s+dinero|gastos\s+controlados|control\s+económico)",
];

pub const ECONOMIC_TOPIC: &str = r"\b(dinero|pagos?|gastos|finanzas|recursos\s+económicos)\b";

pub const DIRECT_THREAT: &[&str] = &[
    r"\b(te\s+voy\s+a|vas\s+a\s+ver|te\s+arrepentirás|pagarás|lo\s+vas\s+a\s+lamentar)",
    r"\b(amenaz|consecuencias\s+graves|te\s+va\s+a\s+ir\s+mal)",
];

pub const VEILED_THREAT: &[&str] = &[
    r"\b(sería\s+una\s+lástima|no\s+quiero\s+que\s+pase|podría\s+suceder|mejor\s+que\s+no)",
    r"\b(no\s+sería\s+bueno|no\s+te\s+conviene|sería\s+mejor\s+que)",
    r"\b(espero\s+que\s+no|ojalá\s+no\s+tenga\s+que)",
];

pub const INVALIDATION: &[&str] = &[
    r"\b(no\s+es\s+para\s+tanto|exageras|no\s+es\s+tan\s+grave|te\s+quejas\s+de\s+nada)",
    r"\b(no\s+tienes\s+razón|estás\s+mal|no\s+es\s+así\s+como\s+dices)",
    r"\b(no\s+es\s+importante|no\s+vale\s+la\s+pena|no\s+es\s+nada)",
];

pub const EMOTIONAL_MANIPULATION: &[&str] = &[
    r"\b(por\s+mi\s+causa|por\s+tu\s+culpa|si\s+me\s+quieres|si\s+realmente\s+me\s+amas)",
    r"\b(me\s+haces\s+daño|me\s+lastimas|me\s+decepcionas|no\s+me\s+quieres)",
];

pub const PSYCHOLOGICAL_CONTROL: &[&str] = &[
    r"\b(no\s+puedes|no\s+debes|no\s+te\s+permito|tienes\s+que\s+hacer|debes\s+obedecer)",
    r"\b(decidir\s+por\s+ti|no\s+tienes\s+opción|sin\s+mi\s+permiso)",
    r"\b(prohibir|prohibido|no\s+se\s+permite|no\s+está\s+permitido)",
];

pub const ISOLATION: &[&str] = &[
    r"\b(no\s+veas|no\s+hables\s+con|no\s+te\s+acerques|alejarte\s+de|separarte\s+de)",
    r"\b(no\s+confíes|no\s+les\s+creas|ellos\s+no\s+te\s+quieren|solo\s+yo)",
    r"\b(aislar|aislamiento)",
];

pub const HUMILIATION: &[&str] = &[
    r"\b(inútil|incapaz|no\s+sirves|no\s+vales|no\s+eres\s+nada)",
    r"\b(desprecio|menosprecio|ridícul|burla)",
    r"\b(estúpid|tont[oa]s?\b|idiota|sin\s+valor)",
];

pub const EMOTIONAL_BLACKMAIL: &[&str] = &[
    r"\b(si\s+no\s+haces|si\s+no\s+obedeces|si\s+no\s+cumples|si\s+no\s+quieres)",
    r"\b(te\s+dejo|te\s+abandono)\b",
    r"\b(chantaje|presión\s+emocional|manipulación\s+emocional)",
];

/// Self-contradiction markers, reported apart from the categories
pub const CONTRADICTION: &[&str] = &[
    r"\b(antes\s+dije|ahora\s+digo|pero\s+antes|sin\s+embargo\s+antes)",
    r"\b(cambiar\s+de\s+opinión|cambio\s+de\s+actitud|ahora\s+pienso\s+diferente)",
    r"\b(no\s+es\s+lo\s+que\s+dije|me\s+malinterpretaste|no\s+es\s+así)",
];

pub fn contradictions() -> ContradictionDefinition {
    ContradictionDefinition::from_patterns(Language::Spanish, CONTRADICTION)
}

pub fn definition() -> LexiconDefinition {
    LexiconDefinition {
        jurisdiction: Jurisdiction::DK,
        language: Language::Spanish,
        name: Some("Documentos (español)".to_string()),
        categories: vec![
            CategoryDefinition::from_patterns(Category::Gaslighting, GASLIGHTING),
            CategoryDefinition::from_patterns(Category::EconomicCoercion, ECONOMIC_COERCION)
                .with_rule(RuleDefinition::with_severity(ECONOMIC_TOPIC, Severity::Low)),
            CategoryDefinition::from_patterns(Category::DirectThreat, DIRECT_THREAT),
            CategoryDefinition::from_patterns(Category::VeiledThreat, VEILED_THREAT),
            CategoryDefinition::from_patterns(Category::Invalidation, INVALIDATION),
            CategoryDefinition::from_patterns(
                Category::EmotionalManipulation,
                EMOTIONAL_MANIPULATION,
            ),
            CategoryDefinition::from_patterns(
                Category::PsychologicalControl,
                PSYCHOLOGICAL_CONTROL,
            ),
            CategoryDefinition::from_patterns(Category::Isolation, ISOLATION),
            CategoryDefinition::from_patterns(Category::Humiliation, HUMILIATION),
            CategoryDefinition::from_patterns(Category::EmotionalBlackmail, EMOTIONAL_BLACKMAIL),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn matches(category: Category, text: &str) -> bool {
        let lexicon = Lexicon::compile(&definition()).unwrap();
        lexicon
            .rules_for(category)
            .iter()
            .any(|r| r.regex().is_match(text))
    }

    #[test]
    fn test_accented_patterns_case_insensitive() {
        assert!(matches(Category::Gaslighting, "ESO NO PASÓ así"));
        assert!(matches(Category::DirectThreat, "Te arrepentirás de esto"));
    }

    #[test]
    fn test_inflected_endings() {
        assert!(matches(Category::DirectThreat, "me amenazó ayer"));
        assert!(matches(Category::Humiliation, "eres un estúpido"));
    }

    #[test]
    fn test_economic_topic_rule_is_low() {
        let lexicon = Lexicon::compile(&definition()).unwrap();
        let topic = lexicon
            .rules_for(Category::EconomicCoercion)
            .iter()
            .find(|r| r.pattern == ECONOMIC_TOPIC)
            .unwrap();
        assert_eq!(topic.severity_hint, Some(Severity::Low));
        assert!(topic.regex().is_match("los pagos del mes"));
    }

    #[test]
    fn test_neutral_text() {
        for category in lexicon_categories() {
            assert!(!matches(category, "La reunión es el martes a las diez."));
        }
    }

    fn lexicon_categories() -> Vec<Category> {
        definition().categories.iter().map(|c| c.category).collect()
    }
}
