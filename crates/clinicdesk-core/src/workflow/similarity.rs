//! Near-duplicate detection for free-text catalog entries.

use strsim::jaro_winkler;

/// Minimum Jaro-Winkler score for two catalog entries to be flagged as similar.
pub const SIMILARITY_THRESHOLD: f64 = 0.90;

/// Most similar candidate to `query`, if any clears the threshold.
///
/// Comparison is case-insensitive; exact (case-sensitive) matches are skipped
/// since they are the same entry.
pub fn closest_match<'c, I>(query: &str, candidates: I) -> Option<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    let needle = query.trim().to_lowercase();
    candidates
        .into_iter()
        .filter(|c| *c != query)
        .map(|c| (c, jaro_winkler(&needle, &c.to_lowercase())))
        .filter(|(_, score)| *score >= SIMILARITY_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_typo() {
        let catalog = ["Acute bronchitis", "Migraine"];
        assert_eq!(closest_match("Acute bronchitls", catalog), Some("Acute bronchitis"));
    }

    #[test]
    fn test_flags_case_variant() {
        let catalog = ["Migraine"];
        assert_eq!(closest_match("migraine", catalog), Some("Migraine"));
    }

    #[test]
    fn test_ignores_unrelated_and_identical() {
        let catalog = ["Migraine", "Otitis media"];
        assert_eq!(closest_match("Sprained ankle", catalog), None);
        assert_eq!(closest_match("Migraine", ["Migraine"]), None);
    }
}
