//! TextHeuristic: founder and pedigree guessed from web search snippets
//!
//! Used for organizational landmarks. The guesses come from an
//! [`Extractor`] and are linked at reduced weight with the snippet as
//! provenance. When nothing usable comes back, a source-tagged placeholder
//! principal is linked instead so the organization never stays bare.

use super::heuristic::{Extraction, Extractor};
use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{canonical_key, provenance, Axis, Graph, Node, NodeKind, Provenance};
use crate::source::WebSearch;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

const EXTRACTED_WEIGHT: f64 = 0.8;
const PLACEHOLDER_WEIGHT: f64 = 0.5;
const SEARCH_SOURCE: &str = "web-search";
const PLACEHOLDER_SOURCE: &str = "placeholder";

/// Search query targeting the principal's professional profile
pub fn founder_query(organization: &str) -> String {
    format!("site:linkedin.com \"Founder\" OR \"CEO\" \"{}\"", organization)
}

pub struct TextHeuristic {
    web: Arc<dyn WebSearch>,
    extractor: Box<dyn Extractor>,
}

impl TextHeuristic {
    pub fn new(web: Arc<dyn WebSearch>, extractor: Box<dyn Extractor>) -> Self {
        Self { web, extractor }
    }

    fn link_extraction(
        &self,
        anchor: &Anchor,
        found: Extraction,
        graph: &mut Graph,
        report: &mut AxisReport,
    ) -> Result<(), AxisError> {
        info!(organization = %anchor.name, principal = %found.principal, "Likely founder");
        let person_key = canonical_key(NodeKind::Person, &[&found.principal]);
        let person = Node::of_kind(NodeKind::Person, found.principal.clone()).with_source(SEARCH_SOURCE);
        report.node(graph.upsert_node(person_key.clone(), person));
        report.edge(graph.link(
            &person_key,
            &anchor.key,
            Axis::TextHeuristic,
            EXTRACTED_WEIGHT,
            snippet_meta("founder", &found.snippet),
        )?);

        let Some(studio) = found.prior_affiliation else {
            info!(principal = %found.principal, "No prior affiliation in snippet");
            return Ok(());
        };
        let studio_key = canonical_key(NodeKind::TraditionalStudio, &[&studio]);
        let node = Node::of_kind(NodeKind::TraditionalStudio, studio).with_source(SEARCH_SOURCE);
        report.node(graph.upsert_node(studio_key.clone(), node));
        report.edge(graph.link(
            &person_key,
            &studio_key,
            Axis::TextHeuristic,
            EXTRACTED_WEIGHT,
            snippet_meta("alumni", &found.snippet),
        )?);
        Ok(())
    }

    fn link_placeholder(
        &self,
        anchor: &Anchor,
        graph: &mut Graph,
        report: &mut AxisReport,
    ) -> Result<(), AxisError> {
        let name = format!("Founder of {}", anchor.name);
        let key = canonical_key(NodeKind::Person, &[&name]);
        let node = Node::of_kind(NodeKind::Person, name).with_source(PLACEHOLDER_SOURCE);
        report.node(graph.upsert_node(key.clone(), node));

        let meta = provenance([
            ("relationship", Value::from("founder")),
            ("provisional", Value::Bool(true)),
            ("source", Value::from(PLACEHOLDER_SOURCE)),
        ]);
        report.edge(graph.link(&key, &anchor.key, Axis::TextHeuristic, PLACEHOLDER_WEIGHT, meta)?);
        Ok(())
    }
}

/// Whether a founder edge already hangs off the anchor
fn has_founder(graph: &Graph, anchor: &Anchor) -> bool {
    graph
        .edges_on(Axis::TextHeuristic)
        .filter(|edge| edge.touches(&anchor.key))
        .any(|edge| edge.meta.get("relationship").and_then(Value::as_str) == Some("founder"))
}

fn snippet_meta(relationship: &str, snippet: &str) -> Provenance {
    provenance([
        ("relationship", relationship),
        ("snippet", snippet),
        ("source", SEARCH_SOURCE),
    ])
}

#[async_trait]
impl AxisEngine for TextHeuristic {
    fn kind(&self) -> AxisKind {
        AxisKind::Heuristic
    }

    /// Founder searches only make sense for organizations
    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.is_kind(NodeKind::Agency)
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();

        let extraction = match self.web.search(&founder_query(&anchor.name)).await {
            Some(results) => self.extractor.extract(&anchor.name, &results),
            None => {
                warn!(organization = %anchor.name, "Web search unavailable");
                report.source_unavailable();
                None
            }
        };

        match extraction {
            Some(found) => self.link_extraction(anchor, found, graph, &mut report)?,
            None if has_founder(graph, anchor) => {
                info!(organization = %anchor.name, "Founder already known, no placeholder");
            }
            None => self.link_placeholder(anchor, graph, &mut report)?,
        }
        Ok(report)
    }
}
