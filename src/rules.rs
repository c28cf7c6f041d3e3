// src/rules.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule '{0}' has no keywords")]
    NoKeywords(String),

    #[error("rule '{0}' has an empty keyword")]
    EmptyKeyword(String),

    #[error("rule '{topic}' keyword '{keyword}' is not lowercase")]
    NotLowercase { topic: String, keyword: String },

    #[error("rule '{topic}' lists keyword '{keyword}' more than once")]
    DuplicateKeyword { topic: String, keyword: String },

    #[error("rule '{0}' has no candidate replies")]
    NoCandidates(String),

    #[error("fallback set has no replies")]
    EmptyFallback,
}

/// A trigger-word set mapped to the replies it can produce.
#[derive(Debug, Clone)]
pub struct ResponseRule {
    topic: String,
    keywords: Vec<String>,
    candidates: Vec<String>,
}

impl ResponseRule {
    pub fn new<K, C>(topic: impl Into<String>, keywords: K, candidates: C) -> Result<Self, RuleError>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let topic = topic.into();
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();

        if keywords.is_empty() {
            return Err(RuleError::NoKeywords(topic));
        }
        for (i, keyword) in keywords.iter().enumerate() {
            if keyword.is_empty() {
                return Err(RuleError::EmptyKeyword(topic));
            }
            if *keyword != keyword.to_lowercase() {
                return Err(RuleError::NotLowercase { topic, keyword: keyword.clone() });
            }
            if keywords[..i].contains(keyword) {
                return Err(RuleError::DuplicateKeyword { topic, keyword: keyword.clone() });
            }
        }
        if candidates.is_empty() {
            return Err(RuleError::NoCandidates(topic));
        }

        Ok(Self { topic, keywords, candidates })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// First listed keyword contained in an already-lowercased utterance.
    pub fn first_match(&self, lowered: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }
}

/// Replies used when no rule matches. Never empty.
#[derive(Debug, Clone)]
pub struct FallbackSet(Vec<String>);

impl FallbackSet {
    pub fn new<C>(candidates: C) -> Result<Self, RuleError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
        if candidates.is_empty() {
            return Err(RuleError::EmptyFallback);
        }
        Ok(Self(candidates))
    }

    pub fn candidates(&self) -> &[String] {
        &self.0
    }
}

pub fn greeting(display_name: &str) -> String {
    format!(
        "Hello {}! I'm your AI mental health companion. I'm here to listen, support, and guide you through any challenges you're facing. How are you feeling today?",
        display_name
    )
}

pub fn default_rules() -> Result<Vec<ResponseRule>, RuleError> {
    Ok(vec![
        ResponseRule::new(
            "sad",
            ["sad", "depressed", "down", "low"],
            [
                "I hear that you're feeling sad, and I want you to know that your feelings are completely valid. It's okay to have difficult days. What's been weighing on your mind lately?",
                "Thank you for sharing that with me. Feeling down can be really tough. Sometimes it helps to talk through what's causing these feelings. Would you like to share more?",
                "I'm sorry you're going through a difficult time. Remember that sadness is a natural emotion, and you don't have to face it alone. What usually helps you feel a little better?",
            ],
        )?,
        ResponseRule::new(
            "anxious",
            ["anxious", "worried", "stressed", "anxiety", "panic"],
            [
                "Anxiety can feel overwhelming, but you're taking a positive step by reaching out. Let's try some breathing exercises together. Take a deep breath in for 4 counts, hold for 4, and exhale for 6.",
                "I understand that anxiety can make everything feel more intense. You're safe right now. What's one thing you can see, hear, and feel around you? This can help ground you in the present moment.",
                "Stress and worry are challenging, but remember that you've handled difficult situations before. What strategies have helped you cope with stress in the past?",
            ],
        )?,
        ResponseRule::new(
            "positive",
            ["good", "great", "happy", "excited", "positive"],
            [
                "That's wonderful to hear! I'm so glad you're feeling good today. What's been going particularly well for you?",
                "It's great that you're having a positive day! These moments are important to acknowledge and celebrate. What's bringing you joy right now?",
                "I love hearing when you're feeling good! Positive emotions are just as important to discuss as difficult ones. What's been the highlight of your day?",
            ],
        )?,
        ResponseRule::new(
            "tired",
            ["tired", "exhausted", "sleep", "fatigue"],
            [
                "Feeling tired can really impact your emotional wellbeing. How has your sleep been lately? Good rest is crucial for mental health.",
                "Exhaustion can make everything feel more difficult. Are you getting enough sleep, or is there something else that might be draining your energy?",
                "Being tired affects how we handle stress and emotions. Let's talk about your sleep routine and see if we can identify ways to help you feel more rested.",
            ],
        )?,
        ResponseRule::new(
            "help",
            ["help", "support", "advice"],
            [
                "I'm here to support you in any way I can. What specific area would you like help with today?",
                "Of course, I'd be happy to help! What's been on your mind that you'd like to work through together?",
                "You've come to the right place for support. What kind of guidance are you looking for today?",
            ],
        )?,
    ])
}

pub fn default_fallback() -> Result<FallbackSet, RuleError> {
    FallbackSet::new([
        "Thank you for sharing that with me. Can you tell me more about how you're feeling?",
        "I appreciate you opening up. What would be most helpful for you to talk about right now?",
        "That sounds important. How has this been affecting your daily life?",
        "I'm listening. Would you like to explore this feeling a bit deeper?",
        "It sounds like you're going through something significant. What support do you think would be most helpful right now?",
    ])
}
