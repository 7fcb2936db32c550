//! Danish lexicon for recorded speech (DK/da)
//!
//! Categories line up with the conduct described in Straffeloven § 243
//! (psykisk vold): kontrol, økonomisk pres, nedværdigende adfærd, trusler,
//! gaslighting, manipulation, isolering and psykisk pres.

use crate::contradiction::ContradictionDefinition;
use crate::jurisdiction::{Jurisdiction, Language};
use crate::lexicon::{CategoryDefinition, LexiconDefinition, RuleDefinition};
use shared_types::{Category, Severity};

/// Kontrol
pub const CONTROL: &[&str] = &[
    r"\b(du må ikke|du skal ikke|du kan ikke|du får ikke lov|jeg tillader ikke)\b",
    r"\b(jeg bestemmer|jeg bestemmer over|jeg kontrollerer|jeg styrer)\b",
    r"\b(du skal spørge mig|du skal bede om tilladelse|du skal have min tilladelse)\b",
    r"\b(jeg ved bedre|jeg ved hvad der er bedst|du ved ikke hvad du laver)\b",
    r"\b(du kan ikke klare dig uden mig|du er afhængig af mig)\b",
];

/// Økonomisk pres
pub const ECONOMIC_PRESSURE: &[&str] = &[
    r"\b(du får ingen penge|jeg giver dig ingen penge|du får ikke noget)\b",
    r"\b(jeg betaler ikke|jeg stopper betalingen|du får ikke noget fra mig)\b",
    r"\b(du skylder mig|du er i gæld til mig)\b",
    r"\b(jeg tager pengene|jeg stopper overførslen|ingen penge til dig)\b",
    r"\b(du kan ikke få penge|du får ikke adgang til penge)\b",
];

/// Nedværdigende adfærd
pub const DEGRADING: &[&str] = &[
    r"\b(du er intet værd|du er ingenting|du er ubrugelig|du er værdiløs)\b",
    r"\b(du er dum|du er idiot|du er tåbelig|du er inkompetent)\b",
    r"\b(ingen vil have dig|du er alene)\b",
    r"\b(du er en fejl|du er en skuffelse|du er en byrde)\b",
    r"\b(du er ikke god nok|du er utilstrækkelig)\b",
];

/// Trusler
pub const THREATS: &[&str] = &[
    r"\b(jeg gør dig noget|jeg skader dig|jeg gør ondt)\b",
    r"\b(jeg tager børnene|du får ikke børnene|jeg tager dem fra dig)\b",
    r"\b(jeg anmelder dig|jeg melder dig|jeg rapporterer dig)\b",
    r"\b(du kommer til at fortryde|du vil fortryde|du skal betale)\b",
    r"\b(jeg ødelægger dig|jeg ruinerer dig|jeg knuser dig)\b",
];

/// Threats of leaving carry less weight than threats of harm
pub const ABANDONMENT_THREATS: &str = r"\b(jeg forlader dig|jeg smutter|jeg dropper dig)\b";

pub const GASLIGHTING: &[&str] = &[
    r"\b(det skete ikke|det var ikke sådan|det er ikke sandt)\b",
    r"\b(du husker forkert|du tager fejl|du har misforstået)\b",
    r"\b(det var ikke så slemt|du overdriver|du gør det værre)\b",
    r"\b(jeg sagde det ikke|jeg gjorde det ikke|det var ikke mig)\b",
    r"\b(du opfinder ting|du finder på ting|du lyver)\b",
    r"\b(du er forvirret|du er desorienteret|du ved ikke hvad du snakker om)\b",
];

/// Manipulation
pub const MANIPULATION: &[&str] = &[
    r"\b(hvis du elsker mig|hvis du holder af mig|hvis du respekterer mig)\b",
    r"\b(det er din skyld|du har skylden|det er på grund af dig)\b",
    r"\b(du gør mig ked af det|du sårer mig|du skader mig)\b",
    r"\b(jeg lider på grund af dig|du får mig til at lide)\b",
    r"\b(du er egoistisk|du tænker kun på dig selv)\b",
];

/// Isolering
pub const ISOLATION: &[&str] = &[
    r"\b(du skal ikke se dem|du skal ikke snakke med dem|hold dig væk fra dem)\b",
    r"\b(ingen kan lide dig|de vil ikke have dig|du er ikke velkommen)\b",
    r"\b(du skal være alene|du skal isolere dig)\b",
    r"\b(jeg er den eneste der kan lide dig|kun jeg forstår dig)\b",
];

/// Psykisk pres
pub const PSYCHOLOGICAL_PRESSURE: &[&str] = &[
    r"\b(du er nødt til|du er tvunget til)\b",
    r"\b(jeg kræver|jeg forlanger|jeg insisterer på)\b",
    r"\b(du har ikke noget valg|du har intet valg|du har ingen mulighed)\b",
    r"\b(du må gøre det|du skal gøre det|du er forpligtet)\b",
];

/// Selvmodsigelser
pub const CONTRADICTION: &[&str] = &[
    r"\b(før sagde jeg|nu siger jeg|men før sagde du|jeg har aldrig ment)\b",
    r"\b(jeg har skiftet mening|jeg tænker anderledes nu)\b",
    r"\b(det er ikke det jeg sagde|du misforstod mig|sådan er det ikke)\b",
];

pub fn contradictions() -> ContradictionDefinition {
    ContradictionDefinition::from_patterns(Language::Danish, CONTRADICTION)
}

pub fn definition() -> LexiconDefinition {
    LexiconDefinition {
        jurisdiction: Jurisdiction::DK,
        language: Language::Danish,
        name: Some("Straffeloven § 243 (dansk tale)".to_string()),
        categories: vec![
            CategoryDefinition::from_patterns(Category::PsychologicalControl, CONTROL),
            CategoryDefinition::from_patterns(Category::EconomicCoercion, ECONOMIC_PRESSURE),
            CategoryDefinition::from_patterns(Category::Humiliation, DEGRADING),
            CategoryDefinition::from_patterns(Category::DirectThreat, THREATS).with_rule(
                RuleDefinition::with_severity(ABANDONMENT_THREATS, Severity::Medium),
            ),
            CategoryDefinition::from_patterns(Category::Gaslighting, GASLIGHTING),
            CategoryDefinition::from_patterns(Category::EmotionalManipulation, MANIPULATION),
            CategoryDefinition::from_patterns(Category::Isolation, ISOLATION),
            CategoryDefinition::from_patterns(
                Category::PsychologicalPressure,
                PSYCHOLOGICAL_PRESSURE,
            ),
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
    fn test_threat_patterns() {
        assert!(matches(Category::DirectThreat, "Jeg tager børnene fra dig"));
        assert!(matches(Category::DirectThreat, "så jeg anmelder dig"));
        assert!(!matches(Category::DirectThreat, "jeg tager bussen"));
    }

    #[test]
    fn test_economic_patterns() {
        assert!(matches(Category::EconomicCoercion, "Du får ingen penge"));
        assert!(matches(Category::EconomicCoercion, "du skylder mig"));
    }

    #[test]
    fn test_gaslighting_patterns() {
        assert!(matches(Category::Gaslighting, "Du husker forkert, det skete ikke"));
        assert!(!matches(Category::Gaslighting, "det skete i går"));
    }

    #[test]
    fn test_isolation_patterns() {
        assert!(matches(Category::Isolation, "kun jeg forstår dig"));
    }
}
