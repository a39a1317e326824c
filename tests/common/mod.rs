//! Common test utilities for the integration suites
//!
//! Source fakes plus builders that wire them into an orchestrator over an
//! in-memory or temp-file store.

#![allow(dead_code)]

pub mod fakes;

pub use fakes::{track, FailingAxis, FailingCredits, FakeCatalog, FakeCredits, FakeWeb};

use meridian::config::AxisSettings;
use meridian::source::{CreditSource, TempoDataset, TempoEntry};
use meridian::{FixtureTable, GraphStore, Orchestrator, Sources};
use std::sync::Arc;

/// Tempo dataset around "My Own Summer (Shove It)" at 92 BPM
pub fn tempo_dataset() -> TempoDataset {
    TempoDataset::new(vec![
        TempoEntry::new("Deftones", "My Own Summer (Shove It)", 92.0),
        TempoEntry::new("Hum", "Stars", 95.0),
        TempoEntry::new("Failure", "Stuck on You", 120.0),
    ])
}

/// A catalog that knows Deftones and one of its tracks
pub fn deftones_catalog() -> FakeCatalog {
    FakeCatalog::default()
        .with_artist(1, "Deftones")
        .with_track(100, "Deftones", "My Own Summer (Shove It)", "Around the Fur", "1997-10-28")
}

/// Axis settings with pacing disabled
pub fn settings() -> AxisSettings {
    AxisSettings {
        album_pacing_ms: 0,
        ..AxisSettings::default()
    }
}

pub fn sources(
    catalog: FakeCatalog,
    credits: Arc<dyn CreditSource>,
    web: FakeWeb,
    tempo: TempoDataset,
) -> Sources {
    Sources {
        tempo: Arc::new(tempo),
        catalog: Arc::new(catalog),
        credits,
        web: Arc::new(web),
    }
}

/// Orchestrator over the shipped fixture table
pub fn orchestrator(store: Arc<dyn GraphStore>, sources: Sources) -> Orchestrator {
    let fixtures = FixtureTable::bundled().expect("shipped fixtures parse");
    Orchestrator::new(store, sources, Arc::new(fixtures), &settings())
}

/// Orchestrator with the Deftones catalog, tempo dataset and no credits
pub fn music_orchestrator(store: Arc<dyn GraphStore>) -> Orchestrator {
    orchestrator(
        store,
        sources(
            deftones_catalog(),
            Arc::new(FakeCredits::default()),
            FakeWeb::offline(),
            tempo_dataset(),
        ),
    )
}
