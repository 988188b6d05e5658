use crate::SentimentProbs;

pub const HOOK_PHRASES: &[&str] = &[
    "did you know",
    "stop scrolling",
    "you won't believe",
    "you wont believe",
    "this is crazy",
    "this changed my life",
    "no one talks about",
    "the secret to",
    "here's why",
    "heres why",
    "what nobody tells you",
    "things i wish i knew",
];

pub const CTA_PHRASES: &[&str] = &[
    "link in bio",
    "check the link",
    "click the link",
    "buy now",
    "shop now",
    "use code",
    "tap to",
    "swipe up",
    "follow for more",
    "share this",
    "save this",
    "comment below",
    "tag a friend",
];

/// Only the opening tokens are searched for a hook.
pub const HOOK_WINDOW_WORDS: usize = 8;

pub const EMOJI_SATURATION: usize = 10;

const SWEET_SPOT_MIN: usize = 8;
const SWEET_SPOT_MAX: usize = 30;
const LENGTH_CUTOFF: usize = 60;

/// Maps classifier probabilities to [0,1]; neutral text keeps half credit.
///
/// This is the one place a sub-score is clamped. NaN is passed through.
pub fn sentiment_score(probs: &SentimentProbs) -> f64 {
    let score = 0.2 * probs.negative + 0.5 * probs.neutral + 1.0 * probs.positive;
    score.clamp(0.0, 1.0)
}

pub fn hook_score(caption: &str) -> f64 {
    let lowercase = caption.to_lowercase();
    let opening = lowercase
        .split_whitespace()
        .take(HOOK_WINDOW_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    bool_to_f64(HOOK_PHRASES.iter().any(|phrase| opening.contains(phrase)))
}

pub fn cta_score(caption: &str) -> f64 {
    let lowercase = caption.to_lowercase();
    bool_to_f64(CTA_PHRASES.iter().any(|phrase| lowercase.contains(phrase)))
}

pub fn word_count(caption: &str) -> usize {
    caption.split_whitespace().count()
}

pub fn length_score(caption: &str) -> f64 {
    length_score_for(word_count(caption))
}

/// Triangular fitness over word count, flat at 1.0 across 8-30 words.
pub fn length_score_for(words: usize) -> f64 {
    if words == 0 || words >= LENGTH_CUTOFF {
        return 0.0;
    }
    if (SWEET_SPOT_MIN..=SWEET_SPOT_MAX).contains(&words) {
        return 1.0;
    }
    if words < SWEET_SPOT_MIN {
        return words as f64 / SWEET_SPOT_MIN as f64;
    }
    let span = (LENGTH_CUTOFF - SWEET_SPOT_MAX) as f64;
    1.0 - (words - SWEET_SPOT_MAX) as f64 / span
}

pub fn emoji_count(caption: &str) -> usize {
    caption.chars().filter(|ch| is_emoji(*ch)).count()
}

pub fn emoji_score(caption: &str) -> f64 {
    let count = emoji_count(caption);
    (count as f64 / EMOJI_SATURATION as f64).min(1.0)
}

fn is_emoji(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F300..=0x1FAFF | 0x2600..=0x26FF | 0x2700..=0x27BF
    )
}

fn bool_to_f64(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
