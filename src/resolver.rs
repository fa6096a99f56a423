//! # External Metadata Resolvers
//!
//! DOI and ORCID facts are checked against external services. The importer
//! and validator never talk to those services directly; they go through the
//! [`MetadataResolver`] trait so callers can plug in a network client, an
//! offline stub, or canned fixtures.
//!
//! Failures come in two classes: [`LookupError::NotFound`] is a data error
//! and gets reported, [`LookupError::Unreachable`] means the fact could not
//! be checked and is skipped with a warning.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Why a lookup produced no metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The service answered, but the identifier is unknown
    #[error("not found: {0}")]
    NotFound(String),

    /// The service could not be contacted
    #[error("service unreachable: {0}")]
    Unreachable(String),
}

/// Errors loading resolver fixtures
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// I/O error reading the fixture file
    #[error("Failed to read fixture file: {0}")]
    IoError(#[from] std::io::Error),

    /// Fixture JSON is malformed
    #[error("Invalid fixture JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A (given, family) name pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonName {
    /// Given name(s)
    pub given: String,
    /// Family name
    pub family: String,
}

impl PersonName {
    /// Build a name pair
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    /// `"Given Family"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

/// An author as listed by the bibliographic service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthor {
    /// Name pair
    pub name: PersonName,
    /// Bare ORCID, if the service lists one
    pub orcid: Option<String>,
}

/// Canonical bibliographic metadata for a DOI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationMetadata {
    /// Journal titles (full and abbreviated)
    pub container_titles: Vec<String>,
    /// Print publication year, falling back to online publication year
    pub year: Option<i32>,
    /// Journal volume as published
    pub volume: Option<String>,
    /// Page range
    pub pages: Option<String>,
    /// Authors in publication order
    pub authors: Vec<ResolvedAuthor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CrossrefWork {
    #[serde(default)]
    container_title: Vec<String>,
    published_print: Option<CrossrefDate>,
    published_online: Option<CrossrefDate>,
    volume: Option<String>,
    page: Option<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<i32>>,
}

impl CrossrefDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|parts| parts.first()).copied()
    }
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    #[serde(default)]
    given: String,
    #[serde(default)]
    family: String,
    #[serde(rename = "ORCID")]
    orcid: Option<String>,
}

/// Crossref lists ORCIDs as `http://orcid.org/0000-...`; keep the identifier
pub fn strip_orcid_url(orcid: &str) -> &str {
    match orcid.rfind('/') {
        Some(idx) => &orcid[idx + 1..],
        None => orcid,
    }
}

impl PublicationMetadata {
    /// Parse a Crossref `works` response, either the full envelope or its
    /// `message` object
    pub fn from_crossref_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_crossref_value(value)
    }

    fn from_crossref_value(mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if let Some(message) = value.get_mut("message") {
            value = message.take();
        }
        let work: CrossrefWork = serde_json::from_value(value)?;
        let year = work
            .published_print
            .as_ref()
            .and_then(CrossrefDate::year)
            .or_else(|| work.published_online.as_ref().and_then(CrossrefDate::year));

        Ok(PublicationMetadata {
            container_titles: work.container_title,
            year,
            volume: work.volume,
            pages: work.page,
            authors: work
                .author
                .into_iter()
                .map(|a| ResolvedAuthor {
                    name: PersonName::new(a.given, a.family),
                    orcid: a.orcid.as_deref().map(|o| strip_orcid_url(o).to_string()),
                })
                .collect(),
        })
    }
}

/// Source of canonical bibliographic and identity facts
pub trait MetadataResolver {
    /// Fetch publication metadata for a DOI
    fn resolve_reference(&self, doi: &str) -> Result<PublicationMetadata, LookupError>;

    /// Fetch the public name registered for an ORCID
    fn resolve_identity(&self, orcid: &str) -> Result<PersonName, LookupError>;
}

/// Resolver for machines without network access: every lookup reports the
/// service as unreachable, so dependent checks are skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl MetadataResolver for OfflineResolver {
    fn resolve_reference(&self, doi: &str) -> Result<PublicationMetadata, LookupError> {
        Err(LookupError::Unreachable(format!("offline, DOI {} not resolved", doi)))
    }

    fn resolve_identity(&self, orcid: &str) -> Result<PersonName, LookupError> {
        Err(LookupError::Unreachable(format!("offline, ORCID {} not resolved", orcid)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    references: HashMap<String, serde_json::Value>,
    #[serde(default)]
    identities: HashMap<String, PersonName>,
}

/// In-memory resolver with canned answers; unknown identifiers are
/// reported as not found.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    references: HashMap<String, PublicationMetadata>,
    identities: HashMap<String, PersonName>,
    unreachable: bool,
}

impl StaticResolver {
    /// Empty resolver: every lookup is "not found"
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that simulates a network failure on every lookup
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    /// Register metadata for a DOI
    pub fn with_reference(mut self, doi: impl Into<String>, metadata: PublicationMetadata) -> Self {
        self.references.insert(doi.into(), metadata);
        self
    }

    /// Register the name behind an ORCID
    pub fn with_identity(mut self, orcid: impl Into<String>, name: PersonName) -> Self {
        self.identities.insert(orcid.into(), name);
        self
    }

    /// Load fixtures from JSON:
    ///
    /// ```json
    /// {
    ///   "references": { "10.1016/...": { "container-title": ["..."], "author": [] } },
    ///   "identities": { "0000-0003-4425-7097": { "given": "Kyle", "family": "Niemeyer" } }
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let fixtures: Fixtures = serde_json::from_str(json)?;
        let mut resolver = Self::new();
        for (doi, value) in fixtures.references {
            resolver
                .references
                .insert(doi, PublicationMetadata::from_crossref_value(value)?);
        }
        resolver.identities = fixtures.identities;
        Ok(resolver)
    }

    /// Load fixtures from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl MetadataResolver for StaticResolver {
    fn resolve_reference(&self, doi: &str) -> Result<PublicationMetadata, LookupError> {
        if self.unreachable {
            return Err(LookupError::Unreachable("simulated network failure".to_string()));
        }
        self.references
            .get(doi)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(doi.to_string()))
    }

    fn resolve_identity(&self, orcid: &str) -> Result<PersonName, LookupError> {
        if self.unreachable {
            return Err(LookupError::Unreachable("simulated network failure".to_string()));
        }
        self.identities
            .get(orcid)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(orcid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSREF: &str = r#"{
        "status": "ok",
        "message": {
            "container-title": ["Combustion and Flame"],
            "published-print": {"date-parts": [[2012, 5]]},
            "published-online": {"date-parts": [[2011, 9, 20]]},
            "volume": "159",
            "page": "918-926",
            "author": [
                {"given": "Bryan W.", "family": "Weber", "ORCID": "http://orcid.org/0000-0003-0815-9270"},
                {"given": "Chih-Jen", "family": "Sung"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_crossref_envelope() {
        let meta = PublicationMetadata::from_crossref_json(CROSSREF).unwrap();
        assert_eq!(meta.container_titles, vec!["Combustion and Flame".to_string()]);
        assert_eq!(meta.year, Some(2012));
        assert_eq!(meta.volume.as_deref(), Some("159"));
        assert_eq!(meta.pages.as_deref(), Some("918-926"));
        assert_eq!(meta.authors.len(), 2);
        assert_eq!(meta.authors[0].orcid.as_deref(), Some("0000-0003-0815-9270"));
        assert_eq!(meta.authors[1].name.full_name(), "Chih-Jen Sung");
    }

    #[test]
    fn test_online_year_fallback() {
        let json = r#"{"published-online": {"date-parts": [[2017]]}}"#;
        let meta = PublicationMetadata::from_crossref_json(json).unwrap();
        assert_eq!(meta.year, Some(2017));
        assert!(meta.authors.is_empty());
    }

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new()
            .with_identity("0000-0003-4425-7097", PersonName::new("Kyle", "Niemeyer"));
        assert_eq!(
            resolver.resolve_identity("0000-0003-4425-7097").unwrap().family,
            "Niemeyer"
        );
        assert!(matches!(
            resolver.resolve_reference("10.1/none"),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            StaticResolver::unreachable().resolve_identity("x"),
            Err(LookupError::Unreachable(_))
        ));
        assert!(matches!(
            OfflineResolver.resolve_reference("10.1/x"),
            Err(LookupError::Unreachable(_))
        ));
    }

    #[test]
    fn test_fixtures_from_json() {
        let json = r#"{
            "references": {"10.1/abc": {"container-title": ["Fuel"], "volume": "1"}},
            "identities": {"0000-0001-0002-0003": {"given": "Jane", "family": "Doe"}}
        }"#;
        let resolver = StaticResolver::from_json(json).unwrap();
        let meta = resolver.resolve_reference("10.1/abc").unwrap();
        assert_eq!(meta.container_titles, vec!["Fuel".to_string()]);
        assert_eq!(
            resolver.resolve_identity("0000-0001-0002-0003").unwrap(),
            PersonName::new("Jane", "Doe")
        );
    }

    #[test]
    fn test_strip_orcid_url() {
        assert_eq!(strip_orcid_url("http://orcid.org/0000-0001"), "0000-0001");
        assert_eq!(strip_orcid_url("0000-0001"), "0000-0001");
    }
}
