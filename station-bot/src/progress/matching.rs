//! Fuzzy resolution of free-form text to a station.

use crate::domain::Station;

/// Minimum similarity (exclusive, on a 0–100 scale) for a query to count
/// as naming a station.
pub const MATCH_THRESHOLD: f64 = 95.0;

/// Why a query could not be resolved to a station.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// There are no stations to match against
    #[error("no stations loaded")]
    EmptyDirectory,

    /// The best candidate was not similar enough
    #[error("no match found, closest match: {closest_match} ({score:.0}%)")]
    NotFound { closest_match: String, score: f64 },
}

/// Find the station whose name best matches `query`.
///
/// Both sides are normalized (case folded, whitespace and punctuation
/// removed) and compared by normalized edit distance. The highest score
/// wins, ties going to the earlier station. The winner is returned only
/// if its score exceeds [`MATCH_THRESHOLD`]; otherwise its name and score
/// are reported as a near miss.
pub fn find_best_match<'a>(stations: &'a [Station], query: &str) -> Result<&'a Station, MatchError> {
    let query = normalize(query);

    let mut best: Option<(&Station, f64)> = None;
    for station in stations {
        let score = similarity(&query, &normalize(&station.name));
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((station, score));
        }
    }

    let (station, score) = best.ok_or(MatchError::EmptyDirectory)?;
    if score > MATCH_THRESHOLD {
        Ok(station)
    } else {
        Err(MatchError::NotFound {
            closest_match: station.name.clone(),
            score,
        })
    }
}

/// Lowercase and keep only alphanumeric characters.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity of two normalized strings on a 0–100 scale.
///
/// An empty side never matches anything.
fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}
