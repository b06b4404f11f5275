//! Keyword-based scoring of a single chat exchange.
//!
//! A deterministic scorer over fixed lexicons, not a model. Matching is
//! case-folded substring search without word boundaries ("lol" inside
//! "lollipop" counts), so scores stay comparable with profiles written by
//! earlier versions of the scorer.

use crate::metrics::{ConnectionStyle, EnergyLevel, InteractionMetrics};

const FLIRT_MARKERS: &[&str] = &["😊", "😉", "💕", "haha", "lol"];
const WIT_MARKERS: &[&str] = &["clever", "witty", "joke"];
const PERSONAL_MARKERS: &[&str] = &["i", "you", "we", "us"];

const EXCITED_MARKERS: &[&str] = &["😄", "😊", "🎉", "✨"];
const ROMANTIC_MARKERS: &[&str] = &["💕", "💗", "🥰"];
const LAUGH_MARKERS: &[&str] = &["haha", "lol", "😂"];
const THOUGHT_MARKERS: &[&str] = &["think", "why", "how"];
const FLIRTY_MARKERS: &[&str] = &["😊", "😉"];

/// Score one user-message/companion-response pair.
///
/// Total over arbitrary strings, including empty ones; never fails. The
/// returned `witty_exchanges` is this turn's contribution only; the
/// cumulative counter is maintained by the aggregation step.
pub fn analyze(user_message: &str, bot_response: &str) -> InteractionMetrics {
    let combined = format!(
        "{} {}",
        user_message.to_lowercase(),
        bot_response.to_lowercase()
    );

    InteractionMetrics {
        flirt_level: flirt_level(user_message),
        charm_factor: charm_factor(bot_response),
        witty_exchanges: count_markers(&combined, WIT_MARKERS) as u64,
        energy_level: energy_level(user_message),
        connection_style: connection_style(&combined),
    }
}

/// Flirt intensity of the user's message.
///
/// The +1 keeps a zero-signal message from reading as zero enthusiasm
/// (baseline score 2); the score saturates at 10 instead of growing
/// unbounded.
fn flirt_level(message: &str) -> u8 {
    let count = count_markers(&message.to_lowercase(), FLIRT_MARKERS);
    ((count + 1) * 2).min(10) as u8
}

/// Charm of the companion's response, from the response alone.
///
/// Base 5, +1 for a long response, +2 for an emoji, +2 for a personal
/// reference. No deduction path exists, so the floor is the base.
fn charm_factor(response: &str) -> u8 {
    let mut factor: u8 = 5;
    if response.split(' ').count() > 10 {
        factor += 1;
    }
    if response.chars().any(is_pictographic) {
        factor += 2;
    }
    if contains_any(&response.to_lowercase(), PERSONAL_MARKERS) {
        factor += 2;
    }
    factor.min(10)
}

/// Mood classification over the user message only. First match wins.
fn energy_level(message: &str) -> EnergyLevel {
    if message.contains('!') || contains_any(message, EXCITED_MARKERS) {
        EnergyLevel::Excited
    } else if contains_any(message, ROMANTIC_MARKERS) {
        EnergyLevel::Romantic
    } else if message.chars().count() > 100 || message.contains('?') {
        EnergyLevel::Intellectual
    } else if contains_any(&message.to_lowercase(), LAUGH_MARKERS) {
        EnergyLevel::Playful
    } else {
        EnergyLevel::Chill
    }
}

/// Relational-style classification over the combined lower-cased exchange.
/// Fixed priority order; an explicit romantic emoji always outranks a
/// question mark. First match wins.
fn connection_style(combined: &str) -> ConnectionStyle {
    if contains_any(combined, ROMANTIC_MARKERS) {
        ConnectionStyle::Charming
    } else if combined.contains('?') || contains_any(combined, THOUGHT_MARKERS) {
        ConnectionStyle::Intellectual
    } else if contains_any(combined, LAUGH_MARKERS) {
        ConnectionStyle::Playful
    } else if contains_any(combined, FLIRTY_MARKERS) {
        ConnectionStyle::Flirty
    } else {
        ConnectionStyle::Supportive
    }
}

/// Non-overlapping occurrence count summed across markers.
fn count_markers(text: &str, markers: &[&str]) -> usize {
    markers.iter().map(|m| text.matches(m).count()).sum()
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Extended pictographic range used by the charm heuristic (U+1F300 through
/// U+1F9FF covers the common emoji blocks).
fn is_pictographic(c: char) -> bool {
    matches!(u32::from(c), 0x1F300..=0x1F9FF)
}
