//! MemberGraph: shared musicians across bands (the deep dive)
//!
//! Resolves the landmark in the credit database (first hit wins), then:
//!
//! - for a band: each member gets a `current-member` edge (1.0), and each
//!   of that member's other groups gets an `also-in` edge from the member
//!   (0.9) plus a `shared-member` shortcut from the landmark (0.75);
//! - for a solo act with no members: each listed group gets a
//!   `group-affiliation` edge (0.95).
//!
//! Request spacing is the credit client's job; this axis issues calls
//! back to back.

use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{
    canonical_key, normalize, provenance, ArtistDetails, Axis, Graph, Node, NodeDetails, NodeKey,
    NodeKind, PersonDetails,
};
use crate::source::{CreditRef, CreditSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MEMBER_WEIGHT: f64 = 1.0;
const ALSO_IN_WEIGHT: f64 = 0.9;
const SHARED_MEMBER_WEIGHT: f64 = 0.75;
const GROUP_AFFILIATION_WEIGHT: f64 = 0.95;

pub struct MemberGraph {
    credits: Arc<dyn CreditSource>,
    member_limit: usize,
    group_limit: usize,
    solo_group_limit: usize,
}

impl MemberGraph {
    pub fn new(
        credits: Arc<dyn CreditSource>,
        member_limit: usize,
        group_limit: usize,
        solo_group_limit: usize,
    ) -> Self {
        Self {
            credits,
            member_limit,
            group_limit,
            solo_group_limit,
        }
    }

    fn group_node(graph: &mut Graph, group: &CreditRef, source: &str, report: &mut AxisReport) -> NodeKey {
        let key = canonical_key(NodeKind::Artist, &[&group.name]);
        let node = Node::new(
            group.name.clone(),
            NodeDetails::Artist(ArtistDetails {
                credit_id: Some(group.id),
                ..Default::default()
            }),
        )
        .with_source(source);
        report.node(graph.upsert_node(key.clone(), node));
        key
    }

    fn link_solo_groups(
        &self,
        anchor: &Anchor,
        groups: &[CreditRef],
        graph: &mut Graph,
        report: &mut AxisReport,
    ) -> Result<(), AxisError> {
        info!(artist = %anchor.name, groups = groups.len(), "No members listed, linking group affiliations");
        let landmark_name = normalize(&anchor.name);
        for group in groups.iter().take(self.solo_group_limit) {
            if normalize(&group.name) == landmark_name {
                continue;
            }
            let group_key = Self::group_node(graph, group, "credits-group", report);
            let meta = provenance([
                ("relationship", "group-affiliation"),
                ("memberName", anchor.name.as_str()),
            ]);
            report.edge(graph.link(&anchor.key, &group_key, Axis::Member, GROUP_AFFILIATION_WEIGHT, meta)?);
        }
        Ok(())
    }
}

#[async_trait]
impl AxisEngine for MemberGraph {
    fn kind(&self) -> AxisKind {
        AxisKind::Members
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();

        let Some(hits) = self.credits.search_by_name(&anchor.name).await else {
            warn!(artist = %anchor.name, "Credit search unavailable");
            report.source_unavailable();
            return Ok(report);
        };
        // First hit wins; no disambiguation between same-named acts
        let Some(hit) = hits.into_iter().next() else {
            info!(artist = %anchor.name, "Artist not found in credit database");
            return Ok(report);
        };
        let Some(profile) = self.credits.profile(hit.id).await else {
            warn!(artist = %anchor.name, "Credit profile unavailable");
            report.source_unavailable();
            return Ok(report);
        };

        if let Some(Node {
            details: NodeDetails::Artist(details),
            ..
        }) = graph.nodes.get_mut(&anchor.key)
        {
            details.credit_id.get_or_insert(hit.id);
        }

        if profile.members.is_empty() {
            self.link_solo_groups(anchor, &profile.groups, graph, &mut report)?;
            return Ok(report);
        }

        let landmark_name = normalize(&anchor.name);
        let mut bridges = 0usize;

        for member in profile.members.iter().take(self.member_limit) {
            let member_key = canonical_key(NodeKind::Person, &[&member.name]);
            let node = Node::new(
                member.name.clone(),
                NodeDetails::Person(PersonDetails {
                    credit_id: Some(member.id),
                    active: Some(member.is_active()),
                }),
            )
            .with_source("credits");
            report.node(graph.upsert_node(member_key.clone(), node));
            let meta = provenance([("role", "current-member")]);
            report.edge(graph.link(&anchor.key, &member_key, Axis::Member, MEMBER_WEIGHT, meta)?);

            let Some(member_profile) = self.credits.profile(member.id).await else {
                report.source_unavailable();
                continue;
            };

            for group in member_profile.groups.iter().take(self.group_limit) {
                if normalize(&group.name) == landmark_name {
                    continue;
                }
                let group_key = Self::group_node(graph, group, "credits-member-group", &mut report);

                let also_in = provenance([
                    ("relationship", "also-in"),
                    ("memberName", member.name.as_str()),
                ]);
                report.edge(graph.link(&member_key, &group_key, Axis::Member, ALSO_IN_WEIGHT, also_in)?);

                let shared = provenance([
                    ("relationship", "shared-member"),
                    ("via", member.name.as_str()),
                ]);
                report.edge(graph.link(&anchor.key, &group_key, Axis::Member, SHARED_MEMBER_WEIGHT, shared)?);
                bridges += 1;
            }
        }

        debug!(artist = %anchor.name, bridges, "Cross-band member connections discovered");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CreditHit, CreditProfile};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeCredits {
        hits: Vec<CreditHit>,
        profiles: HashMap<u64, CreditProfile>,
    }

    #[async_trait]
    impl CreditSource for FakeCredits {
        async fn search_by_name(&self, _name: &str) -> Option<Vec<CreditHit>> {
            Some(self.hits.clone())
        }

        async fn profile(&self, id: u64) -> Option<CreditProfile> {
            self.profiles.get(&id).cloned()
        }
    }

    fn credit(id: u64, name: &str) -> CreditRef {
        CreditRef {
            id,
            name: name.to_string(),
            active: None,
        }
    }

    fn artist_anchor(graph: &mut Graph, name: &str) -> Anchor {
        let key = canonical_key(NodeKind::Artist, &[name]);
        graph.upsert_node(key.clone(), Node::of_kind(NodeKind::Artist, name));
        Anchor::new(name, key)
    }

    #[tokio::test]
    async fn solo_act_links_group_affiliations() {
        let mut credits = FakeCredits::default();
        credits.hits.push(CreditHit { id: 7, name: "Chino Moreno".into() });
        credits.profiles.insert(
            7,
            CreditProfile {
                name: "Chino Moreno".into(),
                members: vec![],
                groups: vec![credit(1, "Deftones"), credit(2, "Crosses"), credit(3, "Palms")],
            },
        );
        let engine = MemberGraph::new(Arc::new(credits), 10, 6, 2);
        let mut graph = Graph::new();
        let anchor = artist_anchor(&mut graph, "Chino Moreno");

        let report = engine.run(&anchor, &mut graph).await.unwrap();

        assert_eq!(report.edges_added, 2);
        let edge = graph
            .find_edge(&anchor.key, &NodeKey::from("artist::crosses"), Axis::Member)
            .unwrap();
        assert_eq!(edge.weight, 0.95);
        assert_eq!(edge.meta["relationship"], "group-affiliation");
    }

    #[tokio::test]
    async fn member_profile_outage_degrades_but_keeps_member_edges() {
        let mut credits = FakeCredits::default();
        credits.hits.push(CreditHit { id: 1, name: "Deftones".into() });
        credits.profiles.insert(
            1,
            CreditProfile {
                name: "Deftones".into(),
                members: vec![credit(10, "Chino Moreno"), credit(11, "Stephen Carpenter")],
                groups: vec![],
            },
        );
        let engine = MemberGraph::new(Arc::new(credits), 10, 6, 8);
        let mut graph = Graph::new();
        let anchor = artist_anchor(&mut graph, "Deftones");

        let report = engine.run(&anchor, &mut graph).await.unwrap();

        assert!(report.degraded);
        assert_eq!(report.edges_added, 2);
        assert_eq!(graph.get_node(&anchor.key).unwrap().connections, 2);
    }

    #[tokio::test]
    async fn unknown_artist_is_not_degraded() {
        let engine = MemberGraph::new(Arc::new(FakeCredits::default()), 10, 6, 8);
        let mut graph = Graph::new();
        let anchor = artist_anchor(&mut graph, "Nobody");

        let report = engine.run(&anchor, &mut graph).await.unwrap();
        assert_eq!(report, AxisReport::default());
    }
}
