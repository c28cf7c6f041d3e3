use rand::Rng;

use crate::rules::{self, FallbackSet, ResponseRule, RuleError};

/// Which candidate pool an utterance lands in.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Rule { rule: &'a ResponseRule, keyword: &'a str },
    Fallback(&'a FallbackSet),
}

impl<'a> Selection<'a> {
    pub fn candidates(&self) -> &'a [String] {
        match *self {
            Selection::Rule { rule, .. } => rule.candidates(),
            Selection::Fallback(set) => set.candidates(),
        }
    }

    pub fn topic(&self) -> Option<&'a str> {
        match *self {
            Selection::Rule { rule, .. } => Some(rule.topic()),
            Selection::Fallback(_) => None,
        }
    }

    /// Uniform draw from the selected pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a str {
        let candidates = self.candidates();
        // pools are validated non-empty at construction
        &candidates[rng.gen_range(0..candidates.len())]
    }
}

#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<ResponseRule>,
    fallback: FallbackSet,
}

impl Responder {
    pub fn new(rules: Vec<ResponseRule>, fallback: FallbackSet) -> Self {
        Self { rules, fallback }
    }

    /// Responder loaded with the built-in wellness rule table.
    pub fn with_default_rules() -> Result<Self, RuleError> {
        Ok(Self::new(rules::default_rules()?, rules::default_fallback()?))
    }

    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &FallbackSet {
        &self.fallback
    }

    /// Table order first, keyword order within a rule second. Matching is a
    /// case-insensitive literal substring test.
    pub fn classify(&self, utterance: &str) -> Selection<'_> {
        let lowered = utterance.to_lowercase();
        self.rules
            .iter()
            .find_map(|rule| {
                rule.first_match(&lowered)
                    .map(|keyword| Selection::Rule { rule, keyword })
            })
            .unwrap_or(Selection::Fallback(&self.fallback))
    }

    pub fn select_response<R: Rng + ?Sized>(&self, utterance: &str, rng: &mut R) -> &str {
        self.classify(utterance).choose(rng)
    }
}
