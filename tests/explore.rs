//! End-to-end exploration runs over fake sources

mod common;

use common::*;
use meridian::graph::{canonical_key, AlbumDetails, Axis, Graph, Node, NodeDetails, NodeKey, NodeKind};
use meridian::{AxisKind, ExploreOutcome, GraphStore, JsonFileStore, MemoryStore, OpenStore};
use std::sync::Arc;
use tempfile::TempDir;

fn track_key(artist: &str, title: &str) -> NodeKey {
    canonical_key(NodeKind::Track, &[artist, title])
}

#[tokio::test]
async fn deftones_tempo_and_era_adds_one_track_at_half_weight() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = music_orchestrator(store.clone());

    let outcome = orchestrator
        .explore("Deftones", Some("My Own Summer"), &[AxisKind::Tempo, AxisKind::Era])
        .await
        .unwrap();
    let stats = outcome.stats().expect("landmark resolves");

    assert_eq!(stats.axes_run, vec![AxisKind::Tempo, AxisKind::Era]);
    assert_eq!(stats.nodes_added, 1);
    assert_eq!(stats.edges_added, 1);
    assert!(stats.persisted);

    let graph = store.load().unwrap();
    let landmark_track = track_key("Deftones", "My Own Summer (Shove It)");
    let stars = track_key("Hum", "Stars");
    let edge = graph.find_edge(&landmark_track, &stars, Axis::Tempo).unwrap();
    assert!((edge.weight - 0.5).abs() < 1e-9);
    assert_eq!(graph.edges_on(Axis::Tempo).count(), 1);

    // Landmark artist, landmark track, one tempo neighbour
    assert_eq!(graph.node_count(), 3);
    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.total_landmarks, 1);
    assert_eq!(graph.landmarks[0].kind, NodeKind::Track);
}

#[tokio::test]
async fn track_resolution_fills_tempo_and_year() {
    let store = Arc::new(MemoryStore::new());
    music_orchestrator(store.clone())
        .explore("deftones", Some("My Own Summer"), &[AxisKind::Tempo])
        .await
        .unwrap();

    let graph = store.load().unwrap();
    let track = graph
        .get_node(&track_key("Deftones", "My Own Summer (Shove It)"))
        .unwrap();
    assert!(track.is_landmark);
    assert_eq!(track.tempo(), Some(92.0));
    assert_eq!(track.year(), Some(1997));

    let artist = canonical_key(NodeKind::Artist, &["Deftones"]);
    let link = graph
        .find_edge(&artist, &track_key("Deftones", "My Own Summer (Shove It)"), Axis::Discography)
        .unwrap();
    assert_eq!(link.weight, 1.0);
}

#[tokio::test]
async fn unresolved_landmark_leaves_graph_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    let store = Arc::new(JsonFileStore::open(&path).unwrap());

    let outcome = music_orchestrator(store.clone())
        .explore("Nobody In Particular", None, &[])
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ExploreOutcome::NotFound {
            query: "Nobody In Particular".into()
        }
    );
    assert!(!path.exists());
    assert_eq!(store.load().unwrap(), Graph::new());
}

#[tokio::test]
async fn unknown_track_falls_back_to_artist() {
    let store = Arc::new(MemoryStore::new());
    let outcome = music_orchestrator(store.clone())
        .explore("Deftones", Some("Not A Real Song"), &[AxisKind::Tempo, AxisKind::Era])
        .await
        .unwrap();
    let stats = outcome.stats().unwrap();

    // No tempo and no year: both axes skip instead of failing
    assert!(stats.axes_run.is_empty());
    assert_eq!(stats.axes_skipped, vec![AxisKind::Tempo, AxisKind::Era]);
    assert_eq!(stats.anchor, canonical_key(NodeKind::Artist, &["Deftones"]));
    assert_eq!(store.load().unwrap().landmarks[0].kind, NodeKind::Track);
}

#[tokio::test]
async fn credit_outage_does_not_stop_sibling_axes() {
    let mut seed = Graph::new();
    seed.upsert_node(
        canonical_key(NodeKind::Album, &["Around the Fur"]),
        Node::new(
            "Around the Fur",
            NodeDetails::Album(AlbumDetails {
                year: Some(1997),
                ..Default::default()
            }),
        ),
    );
    let store = Arc::new(MemoryStore::with_graph(seed));
    let credits = Arc::new(FailingCredits::default());
    let orchestrator = orchestrator(
        store.clone(),
        sources(deftones_catalog(), credits.clone(), FakeWeb::offline(), tempo_dataset()),
    );

    let outcome = orchestrator
        .explore(
            "Deftones",
            Some("My Own Summer"),
            &[AxisKind::Tempo, AxisKind::Members, AxisKind::Era],
        )
        .await
        .unwrap();
    let stats = outcome.stats().unwrap();

    assert!(credits.calls() > 0);
    assert_eq!(
        stats.axes_run,
        vec![AxisKind::Tempo, AxisKind::Members, AxisKind::Era]
    );
    assert_eq!(stats.axes_degraded, vec![AxisKind::Members]);
    assert!(stats.axes_failed.is_empty());

    let graph = store.load().unwrap();
    assert_eq!(graph.edges_on(Axis::Tempo).count(), 1);
    assert_eq!(graph.edges_on(Axis::Era).count(), 1);
    assert_eq!(graph.edges_on(Axis::Member).count(), 0);
}

#[tokio::test]
async fn failing_axis_is_recorded_and_the_run_continues() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator =
        music_orchestrator(store.clone()).with_engine(Arc::new(FailingAxis(AxisKind::Related)));

    let outcome = orchestrator
        .explore("Deftones", Some("My Own Summer"), &[AxisKind::Related, AxisKind::Tempo])
        .await
        .unwrap();
    let stats = outcome.stats().unwrap();

    assert_eq!(stats.axes_failed.len(), 1);
    assert_eq!(stats.axes_failed[0].axis, AxisKind::Related);
    assert_eq!(stats.axes_run, vec![AxisKind::Tempo]);
    assert!(stats.persisted);
    assert_eq!(store.load().unwrap().edges_on(Axis::Tempo).count(), 1);
}

#[tokio::test]
async fn member_deep_dive_builds_bridge_and_shortcut() {
    let credits = FakeCredits::default()
        .with_profile(1, "Deftones", &[(10, "Chino Moreno")], &[])
        .with_profile(10, "Chino Moreno", &[], &[(1, "Deftones"), (2, "Crosses")]);
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(
        store.clone(),
        sources(deftones_catalog(), Arc::new(credits), FakeWeb::offline(), tempo_dataset()),
    );

    orchestrator
        .explore("Deftones", None, &[AxisKind::Members])
        .await
        .unwrap();

    let graph = store.load().unwrap();
    let band = canonical_key(NodeKind::Artist, &["Deftones"]);
    let member = canonical_key(NodeKind::Person, &["Chino Moreno"]);
    let side_project = canonical_key(NodeKind::Artist, &["Crosses"]);

    let weight = |a: &NodeKey, b: &NodeKey| graph.find_edge(a, b, Axis::Member).map(|e| e.weight);
    assert_eq!(weight(&band, &member), Some(1.0));
    assert_eq!(weight(&member, &side_project), Some(0.9));
    assert_eq!(weight(&band, &side_project), Some(0.75));
    let shortcut = graph.find_edge(&band, &side_project, Axis::Member).unwrap();
    assert_eq!(shortcut.meta["relationship"], "shared-member");
}

#[tokio::test]
async fn repeated_exploration_is_idempotent() {
    let catalog = deftones_catalog().with_related(1, &[(2, "Hum"), (3, "Failure")]);
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(
        store.clone(),
        sources(catalog, Arc::new(FakeCredits::default()), FakeWeb::offline(), tempo_dataset()),
    );
    let axes = [AxisKind::Tempo, AxisKind::Related];

    orchestrator.explore("Deftones", Some("My Own Summer"), &axes).await.unwrap();
    let first = store.load().unwrap();
    let second_run = orchestrator
        .explore("Deftones", Some("My Own Summer"), &axes)
        .await
        .unwrap();
    let second = store.load().unwrap();

    let stats = second_run.stats().unwrap();
    assert_eq!(stats.nodes_added, 0);
    assert_eq!(stats.edges_added, 0);
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.edges.len(), second.edges.len());
    assert_eq!(second.landmarks.len(), 1);

    // Degree accounting holds for every node
    for (key, node) in &second.nodes {
        assert_eq!(node.connections as usize, second.degree(key), "degree of {}", key);
    }
}

#[tokio::test]
async fn read_only_store_reports_not_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    JsonFileStore::open(&path).unwrap().save(&Graph::new()).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let store = Arc::new(JsonFileStore::open_read_only(&path).unwrap());
    let outcome = music_orchestrator(store.clone())
        .explore("Deftones", Some("My Own Summer"), &[AxisKind::Tempo])
        .await
        .unwrap();

    let stats = outcome.stats().unwrap();
    assert!(!stats.persisted);
    assert_eq!(stats.edges_added, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(store.load().unwrap(), Graph::new());
}

#[tokio::test]
async fn catalog_outage_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(
        store.clone(),
        sources(
            FakeCatalog::offline(),
            Arc::new(FakeCredits::default()),
            FakeWeb::offline(),
            tempo_dataset(),
        ),
    );

    let outcome = orchestrator.explore("Deftones", None, &[]).await.unwrap();
    assert!(matches!(outcome, ExploreOutcome::NotFound { .. }));
    assert_eq!(store.load().unwrap().node_count(), 0);
}
