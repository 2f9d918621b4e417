//! Shared test utilities

#![allow(dead_code)]

use std::collections::BTreeMap;

use aria_assistant::{FaqStore, SearchResult};

/// Build a search result with all fields present
#[must_use]
pub fn result(title: &str, snippet: &str, link: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        snippet: snippet.to_string(),
        link: link.to_string(),
    }
}

/// Build a FAQ store from literal pairs
#[must_use]
pub fn faq_store(pairs: &[(&str, &str)], cutoff: f32) -> FaqStore {
    let table: BTreeMap<String, String> = pairs
        .iter()
        .map(|(q, a)| ((*q).to_string(), (*a).to_string()))
        .collect();
    FaqStore::from_table(table, cutoff)
}

/// Generate sine wave audio samples
#[must_use]
pub fn sine_samples(sample_rate: u32, frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}
