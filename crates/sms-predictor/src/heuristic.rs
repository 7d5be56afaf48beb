// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Rule-based spam scoring used when no model is available

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;
use serde::Serialize;
use shared_types::{PredictionMethod, SmsLabel};

use crate::types::{ConfidenceScore, SmsVerdict};

/// Score at which a message is labelled spam
pub const SPAM_SCORE_THRESHOLD: u32 = 3;

/// Upper bound on heuristic confidence
pub const MAX_HEURISTIC_CONFIDENCE: f64 = 0.9;

const UPPERCASE_RATIO_LIMIT: f64 = 0.3;
const EXCLAMATION_LIMIT: usize = 2;

/// Spam keywords, English then Vietnamese
pub const SPAM_KEYWORDS: &[&str] = &[
    "free",
    "winner",
    "you won",
    "prize",
    "click",
    "urgent",
    "congratulations",
    "claim",
    "lottery",
    "cash",
    "offer",
    "bonus",
    "verify your account",
    "account suspended",
    "call now",
    "limited time",
    "trúng thưởng",
    "miễn phí",
    "khuyến mãi",
    "nhận quà",
    "chúc mừng",
    "xác minh",
    "click vào",
    "liên hệ ngay",
    "vay tiền",
    "lãi suất",
    "giải thưởng",
    "mật khẩu",
    "otp",
];

static KEYWORD_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(SPAM_KEYWORDS)
        .expect("Spam keyword patterns are valid")
});

static MONEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s*[$€£¥₫]|[$€£¥₫]\s*\d|\d\s*(?:vnd|usd|đ|đồng)\b")
        .expect("Money pattern is valid")
});

/// Signal that contributed to a heuristic score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "signal", content = "detail")]
pub enum HeuristicSignal {
    /// A spam keyword occurred
    Keyword(String),
    /// Too much of the text is uppercase
    Shouting,
    /// More than two exclamation marks
    Exclamations,
    /// A currency amount appeared
    Money,
}

/// Score and the signals behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicScore {
    /// One point per signal
    pub score: u32,
    /// Signals found
    pub signals: Vec<HeuristicSignal>,
}

impl HeuristicScore {
    /// Whether the score reaches the spam threshold
    pub fn is_spam(&self) -> bool {
        self.score >= SPAM_SCORE_THRESHOLD
    }

    /// Confidence in the resulting label
    pub fn confidence(&self) -> f64 {
        let spam_confidence = (f64::from(self.score) / 10.0).min(MAX_HEURISTIC_CONFIDENCE);
        if self.is_spam() {
            spam_confidence
        } else {
            1.0 - spam_confidence
        }
    }
}

/// Keyword and pattern based classifier
///
/// Never fails; any text, including empty text, gets a verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    /// Create a heuristic classifier
    pub fn new() -> Self {
        Self
    }

    /// Score a message
    pub fn score(&self, text: &str) -> HeuristicScore {
        let mut signals = Vec::new();
        let lowered = text.to_lowercase();

        let mut seen = vec![false; SPAM_KEYWORDS.len()];
        for found in KEYWORD_MATCHER.find_overlapping_iter(&lowered) {
            let index = found.pattern().as_usize();
            if !seen[index] {
                seen[index] = true;
                signals.push(HeuristicSignal::Keyword(SPAM_KEYWORDS[index].to_string()));
            }
        }

        let total_chars = text.chars().count();
        if total_chars > 0 {
            let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
            #[allow(clippy::cast_precision_loss)]
            let ratio = uppercase as f64 / total_chars as f64;
            if ratio > UPPERCASE_RATIO_LIMIT {
                signals.push(HeuristicSignal::Shouting);
            }
        }

        if text.matches('!').count() > EXCLAMATION_LIMIT {
            signals.push(HeuristicSignal::Exclamations);
        }

        if MONEY_PATTERN.is_match(text) {
            signals.push(HeuristicSignal::Money);
        }

        HeuristicScore {
            score: u32::try_from(signals.len()).unwrap_or(u32::MAX),
            signals,
        }
    }

    /// Classify a message
    pub fn classify(&self, text: &str) -> SmsVerdict {
        let score = self.score(text);
        let label = if score.is_spam() {
            SmsLabel::Spam
        } else {
            SmsLabel::Ham
        };

        SmsVerdict::new(
            label,
            ConfidenceScore::saturating(score.confidence()),
            PredictionMethod::Heuristic,
        )
    }
}
