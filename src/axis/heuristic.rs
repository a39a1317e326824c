//! Low-confidence text extraction
//!
//! Guesses a principal person and a prior affiliation for an organization
//! from web search snippets. Everything produced here is provisional: the
//! axis that consumes it links at reduced weight and records the snippet
//! the guess came from.

use crate::graph::normalize;
use crate::source::SearchSnippet;
use regex::Regex;

/// A structured guess drawn from one search result
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Likely founder / principal
    pub principal: String,
    /// Likely previous employer of the principal
    pub prior_affiliation: Option<String>,
    /// The snippet text the guess was drawn from
    pub snippet: String,
}

/// A pluggable extraction strategy
pub trait Extractor: Send + Sync {
    fn extract(&self, organization: &str, results: &[SearchSnippet]) -> Option<Extraction>;
}

/// Reads professional-profile search results of the form
/// `"Jane Doe - Founder - Studio | LinkedIn"`.
///
/// The principal is the title up to the first `-`. The prior affiliation is
/// the first word after a phrase like "ex-", "previously at", "former" or
/// "worked at", if it is longer than two characters and is not the
/// organization itself.
pub struct ProfileTitleExtractor {
    profile_marker: String,
    alumni: Regex,
}

impl ProfileTitleExtractor {
    pub fn new() -> Self {
        Self::with_marker("LinkedIn")
    }

    /// Only results whose title contains `marker` are considered.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            profile_marker: marker.into(),
            alumni: Regex::new(r"(?i)(?:ex-|previously at |former |worked at )([A-Z][a-zA-Z\s]+)")
                .expect("alumni pattern is a valid regex"),
        }
    }

    fn prior_affiliation(&self, organization: &str, snippet: &str) -> Option<String> {
        let phrase = self.alumni.captures(snippet)?.get(1)?.as_str().trim();
        let first_word = phrase.split_whitespace().next()?;
        (first_word.chars().count() > 2 && normalize(first_word) != normalize(organization))
            .then(|| first_word.to_string())
    }
}

impl Default for ProfileTitleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ProfileTitleExtractor {
    fn extract(&self, organization: &str, results: &[SearchSnippet]) -> Option<Extraction> {
        let top = results
            .iter()
            .find(|r| r.title.contains(&self.profile_marker))?;

        let principal = top.title.split('-').next()?.trim();
        if principal.is_empty() {
            return None;
        }

        Some(Extraction {
            principal: principal.to_string(),
            prior_affiliation: self.prior_affiliation(organization, &top.snippet),
            snippet: top.snippet.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, snippet: &str) -> SearchSnippet {
        SearchSnippet {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: None,
        }
    }

    #[test]
    fn principal_from_title_and_alumni_from_snippet() {
        let results = vec![
            result("Native Foreign - Home", "An AI-forward studio"),
            result(
                "Nik Kleverov - Founder - Native Foreign | LinkedIn",
                "Director and founder, previously at Pixar Animation Studios.",
            ),
        ];
        let found = ProfileTitleExtractor::new()
            .extract("Native Foreign", &results)
            .unwrap();

        assert_eq!(found.principal, "Nik Kleverov");
        assert_eq!(found.prior_affiliation.as_deref(), Some("Pixar"));
        assert!(found.snippet.contains("previously at Pixar"));
    }

    #[test]
    fn short_or_self_affiliations_are_ignored() {
        let extractor = ProfileTitleExtractor::new();
        assert_eq!(extractor.prior_affiliation("Acme", "ex-HP engineer"), None);
        assert_eq!(extractor.prior_affiliation("Mother", "former Mother LA partner"), None);
        assert_eq!(
            extractor.prior_affiliation("Mother", "Worked at Google Creative Lab"),
            Some("Google".to_string())
        );
    }

    #[test]
    fn no_profile_results_is_none() {
        let results = vec![result("Mother LA | Home", "Independent creative agency")];
        assert!(ProfileTitleExtractor::new().extract("Mother LA", &results).is_none());
    }

    #[test]
    fn missing_pedigree_still_yields_principal() {
        let results = vec![result("Ryan Staake - Director | LinkedIn", "Music video director")];
        let found = ProfileTitleExtractor::new().extract("Pomp & Clout", &results).unwrap();
        assert_eq!(found.principal, "Ryan Staake");
        assert_eq!(found.prior_affiliation, None);
    }
}
