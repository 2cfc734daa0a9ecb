use std::collections::HashMap;
use strsim::jaro_winkler;

/// Short forms the odds books use, normalized alias -> normalized full name
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("la lakers", "los angeles lakers"),
    ("la clippers", "los angeles clippers"),
    ("ny knicks", "new york knicks"),
    ("okc thunder", "oklahoma city thunder"),
    ("gs warriors", "golden state warriors"),
    ("sixers", "philadelphia 76ers"),
    ("blazers", "portland trail blazers"),
    ("real madrid baloncesto", "real madrid"),
    ("fc barcelona", "barcelona"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchConfidence {
    Exact,
    Alias,
    /// Jaro-Winkler similarity of the canonical names
    Fuzzy(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMatch<'a> {
    pub candidate: &'a str,
    pub confidence: MatchConfidence,
}

/// Maps team names from one feed onto another feed's spelling.
pub struct TeamMatcher {
    aliases: HashMap<String, String>,
    threshold: f64,
}

impl TeamMatcher {
    pub fn new(threshold: f64) -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(alias, name)| (alias.to_string(), name.to_string()))
            .collect();

        Self { aliases, threshold }
    }

    /// Add alias -> canonical entries (any spelling, normalized here).
    pub fn with_aliases<'a, I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (alias, name) in aliases {
            self.aliases
                .insert(normalize_team_name(alias), normalize_team_name(name));
        }
        self
    }

    fn canonical(&self, name: &str) -> String {
        let normalized = normalize_team_name(name);
        self.aliases.get(&normalized).cloned().unwrap_or(normalized)
    }

    /// Best candidate for `name`: exact, then alias, then the most similar
    /// name at or above the threshold.
    pub fn match_team<'a, I>(&self, name: &str, candidates: I) -> Option<TeamMatch<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalized = normalize_team_name(name);
        let canonical = self.canonical(name);

        let mut alias_match = None;
        let mut best_fuzzy: Option<(&'a str, f64)> = None;

        for candidate in candidates {
            if normalize_team_name(candidate) == normalized {
                return Some(TeamMatch {
                    candidate,
                    confidence: MatchConfidence::Exact,
                });
            }

            let candidate_canonical = self.canonical(candidate);
            if candidate_canonical == canonical {
                alias_match.get_or_insert(candidate);
                continue;
            }

            let score = jaro_winkler(&canonical, &candidate_canonical);
            if best_fuzzy.map_or(true, |(_, best)| score > best) {
                best_fuzzy = Some((candidate, score));
            }
        }

        if let Some(candidate) = alias_match {
            return Some(TeamMatch {
                candidate,
                confidence: MatchConfidence::Alias,
            });
        }

        best_fuzzy
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(candidate, score)| TeamMatch {
                candidate,
                confidence: MatchConfidence::Fuzzy(score),
            })
    }
}

/// Lowercase, punctuation to spaces, single spaces.
pub fn normalize_team_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &[&str] = &[
        "Boston Celtics",
        "Los Angeles Lakers",
        "Philadelphia 76ers",
        "Miami Heat",
    ];

    #[test]
    fn test_normalize_team_name() {
        assert_eq!(normalize_team_name("  Boston   Celtics. "), "boston celtics");
        assert_eq!(normalize_team_name("St. John's"), "st john s");
        assert_eq!(normalize_team_name("L.A. Lakers"), "l a lakers");
    }

    #[test]
    fn test_exact_match() {
        let matcher = TeamMatcher::new(0.88);
        let found = matcher
            .match_team("BOSTON CELTICS", CANDIDATES.iter().copied())
            .unwrap();
        assert_eq!(found.candidate, "Boston Celtics");
        assert_eq!(found.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn test_alias_match() {
        let matcher = TeamMatcher::new(0.88);
        let found = matcher.match_team("LA Lakers", CANDIDATES.iter().copied()).unwrap();
        assert_eq!(found.candidate, "Los Angeles Lakers");
        assert_eq!(found.confidence, MatchConfidence::Alias);
    }

    #[test]
    fn test_configured_alias() {
        let extra: HashMap<String, String> =
            [("Mengão".to_string(), "Flamengo".to_string())].into_iter().collect();
        let matcher = TeamMatcher::new(0.88).with_aliases(&extra);

        let found = matcher.match_team("Mengão", ["Flamengo", "Franca"]).unwrap();
        assert_eq!(found.candidate, "Flamengo");
        assert_eq!(found.confidence, MatchConfidence::Alias);
    }

    #[test]
    fn test_fuzzy_match() {
        let matcher = TeamMatcher::new(0.88);
        let found = matcher
            .match_team("Philadelphia 76rs", CANDIDATES.iter().copied())
            .unwrap();
        assert_eq!(found.candidate, "Philadelphia 76ers");
        match found.confidence {
            MatchConfidence::Fuzzy(score) => assert!(score >= 0.88 && score < 1.0),
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_below_threshold() {
        let matcher = TeamMatcher::new(0.88);
        assert!(matcher
            .match_team("Real Madrid", CANDIDATES.iter().copied())
            .is_none());
        assert!(matcher.match_team("Boston Celtics", std::iter::empty()).is_none());
    }
}
