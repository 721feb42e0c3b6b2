//! Rule sets and SGF rule-string parsing.
//!
//! A [`Ruleset`] bundles the rule dimensions that affect replay and feature
//! encoding: ko handling, suicide, scoring, territory tax, and the button
//! (first-player pass bonus). Named presets cover the common server rule
//! sets; KataGo-style component strings (`koPOSITIONALscoreAREAsui1...`)
//! are parsed piecewise.

/// How board repetition is restricted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KoRule {
    /// Only the immediate single-stone recapture is forbidden.
    Simple,
    /// No previous board position may be recreated.
    PositionalSuperko,
    /// No previous (position, player-to-move) pair may be recreated.
    SituationalSuperko,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SuicideRule {
    Allowed,
    Disallowed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScoringRule {
    Area,
    Territory,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaxRule {
    NoTax,
    /// Surrounded empty points in seki are not counted.
    Seki,
    /// All alive groups incur up to two points in tax.
    All,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassBonusRule {
    NoBonus,
    Bonus,
}

/// A complete rule configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ruleset {
    pub ko_rule: KoRule,
    pub suicide_rule: SuicideRule,
    pub scoring_rule: ScoringRule,
    pub tax_rule: TaxRule,
    pub pass_bonus_rule: PassBonusRule,
}

pub const TROMP_TAYLOR: Ruleset = Ruleset {
    ko_rule: KoRule::PositionalSuperko,
    suicide_rule: SuicideRule::Allowed,
    scoring_rule: ScoringRule::Area,
    tax_rule: TaxRule::NoTax,
    pass_bonus_rule: PassBonusRule::NoBonus,
};

pub const CHINESE: Ruleset = Ruleset {
    ko_rule: KoRule::Simple,
    suicide_rule: SuicideRule::Disallowed,
    scoring_rule: ScoringRule::Area,
    tax_rule: TaxRule::NoTax,
    pass_bonus_rule: PassBonusRule::NoBonus,
};

pub const JAPANESE: Ruleset = Ruleset {
    ko_rule: KoRule::Simple,
    suicide_rule: SuicideRule::Disallowed,
    scoring_rule: ScoringRule::Territory,
    tax_rule: TaxRule::NoTax,
    pass_bonus_rule: PassBonusRule::NoBonus,
};

pub const AGA: Ruleset = Ruleset {
    ko_rule: KoRule::SituationalSuperko,
    suicide_rule: SuicideRule::Disallowed,
    scoring_rule: ScoringRule::Area,
    tax_rule: TaxRule::NoTax,
    pass_bonus_rule: PassBonusRule::NoBonus,
};

pub const NEW_ZEALAND: Ruleset = Ruleset {
    ko_rule: KoRule::SituationalSuperko,
    suicide_rule: SuicideRule::Allowed,
    scoring_rule: ScoringRule::Area,
    tax_rule: TaxRule::NoTax,
    pass_bonus_rule: PassBonusRule::NoBonus,
};

impl Default for Ruleset {
    fn default() -> Self {
        TROMP_TAYLOR
    }
}

impl Ruleset {
    /// Parses the content of an SGF `RU[...]` property.
    ///
    /// Accepts the common named rule sets (case-insensitive) and KataGo-style
    /// component strings. Returns `None` when the string matches neither a
    /// preset nor any known component token; such records are not usable
    /// for training.
    pub fn from_sgf(text: &str) -> Option<Ruleset> {
        let trimmed = text.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "chinese" | "cn" => return Some(CHINESE),
            "japanese" | "jp" => return Some(JAPANESE),
            "aga" | "bga" | "french" => return Some(AGA),
            "nz" | "new zealand" | "new-zealand" => return Some(NEW_ZEALAND),
            "tromp-taylor" | "tromptaylor" | "tt" => return Some(TROMP_TAYLOR),
            "korean" | "kr" => return Some(JAPANESE),
            _ => {}
        }

        // Component tokens per KataGo's rule-string encoding. Each dimension
        // falls back to its most common value when the token is absent, but
        // at least one token must be present for the string to count as
        // recognized.
        let mut recognized = false;
        let mut rules = Ruleset::default();

        if trimmed.contains("koPOSITIONAL") {
            rules.ko_rule = KoRule::PositionalSuperko;
            recognized = true;
        } else if trimmed.contains("koSITUATIONAL") {
            rules.ko_rule = KoRule::SituationalSuperko;
            recognized = true;
        } else {
            rules.ko_rule = KoRule::Simple;
            recognized |= trimmed.contains("koSIMPLE");
        }

        if trimmed.contains("sui1") {
            rules.suicide_rule = SuicideRule::Allowed;
            recognized = true;
        } else {
            rules.suicide_rule = SuicideRule::Disallowed;
            recognized |= trimmed.contains("sui0");
        }

        if trimmed.contains("scoreAREA") {
            rules.scoring_rule = ScoringRule::Area;
            recognized = true;
        } else {
            rules.scoring_rule = ScoringRule::Territory;
            recognized |= trimmed.contains("scoreTERRITORY");
        }

        if trimmed.contains("taxALL") {
            rules.tax_rule = TaxRule::All;
            recognized = true;
        } else if trimmed.contains("taxSEKI") {
            rules.tax_rule = TaxRule::Seki;
            recognized = true;
        } else {
            rules.tax_rule = TaxRule::NoTax;
            recognized |= trimmed.contains("taxNONE");
        }

        if trimmed.contains("button1") {
            rules.pass_bonus_rule = PassBonusRule::Bonus;
            recognized = true;
        } else {
            rules.pass_bonus_rule = PassBonusRule::NoBonus;
            recognized |= trimmed.contains("button0");
        }

        if recognized { Some(rules) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_presets() {
        assert_eq!(Ruleset::from_sgf("Chinese"), Some(CHINESE));
        assert_eq!(Ruleset::from_sgf("japanese"), Some(JAPANESE));
        assert_eq!(Ruleset::from_sgf("Tromp-Taylor"), Some(TROMP_TAYLOR));
        assert_eq!(Ruleset::from_sgf("NZ"), Some(NEW_ZEALAND));
    }

    #[test]
    fn katago_component_strings() {
        let rules =
            Ruleset::from_sgf("koPOSITIONALscoreAREAtaxNONEsui1whbN-1fpok").unwrap();
        assert_eq!(rules.ko_rule, KoRule::PositionalSuperko);
        assert_eq!(rules.suicide_rule, SuicideRule::Allowed);
        assert_eq!(rules.scoring_rule, ScoringRule::Area);
        assert_eq!(rules.tax_rule, TaxRule::NoTax);

        let rules = Ruleset::from_sgf("koSITUATIONALscoreTERRITORYtaxSEKIsui0").unwrap();
        assert_eq!(rules.ko_rule, KoRule::SituationalSuperko);
        assert_eq!(rules.scoring_rule, ScoringRule::Territory);
        assert_eq!(rules.tax_rule, TaxRule::Seki);
    }

    #[test]
    fn unrecognized_strings_rejected() {
        assert_eq!(Ruleset::from_sgf("freestyle"), None);
        assert_eq!(Ruleset::from_sgf(""), None);
    }

    #[test]
    fn button_rule() {
        let rules = Ruleset::from_sgf("koSIMPLEscoreAREAbutton1").unwrap();
        assert_eq!(rules.pass_bonus_rule, PassBonusRule::Bonus);
    }
}
