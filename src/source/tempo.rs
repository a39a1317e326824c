//! Offline tempo dataset

use serde::Deserialize;
use std::io;
use std::path::Path;

/// One row of the flat tempo dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TempoEntry {
    pub artist: String,
    pub title: String,
    /// Beats per minute
    #[serde(alias = "bpm")]
    pub tempo: f64,
    /// Provider identifier, when the dataset carries one
    #[serde(default)]
    pub id: Option<String>,
}

impl TempoEntry {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, tempo: f64) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            tempo,
            id: None,
        }
    }
}

/// Read-only, ordered tempo dataset scanned synchronously
#[derive(Debug, Clone, Default)]
pub struct TempoDataset {
    entries: Vec<TempoEntry>,
}

impl TempoDataset {
    pub fn new(entries: Vec<TempoEntry>) -> Self {
        Self { entries }
    }

    /// Load a JSON array of entries. A missing file is an empty dataset.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<TempoEntry> = serde_json::from_str(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TempoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose title and artist contain the given strings,
    /// case-insensitively.
    pub fn lookup(&self, artist: &str, title: &str) -> Option<&TempoEntry> {
        let artist = artist.to_lowercase();
        let title = title.to_lowercase();
        self.entries.iter().find(|e| {
            e.title.to_lowercase().contains(&title) && e.artist.to_lowercase().contains(&artist)
        })
    }

    /// Entries with a positive tempo within `window` of `tempo`, paired with
    /// their distance, in dataset order.
    pub fn within(&self, tempo: f64, window: f64) -> impl Iterator<Item = (&TempoEntry, f64)> {
        self.entries.iter().filter_map(move |e| {
            let distance = (e.tempo - tempo).abs();
            (e.tempo > 0.0 && distance <= window).then_some((e, distance))
        })
    }

    /// Artist names, as written in the dataset
    pub fn artists(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.artist.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dataset() -> TempoDataset {
        TempoDataset::new(vec![
            TempoEntry::new("Deftones", "My Own Summer (Shove It)", 92.0),
            TempoEntry::new("Deftones", "Change (In the House of Flies)", 74.0),
            TempoEntry::new("Hum", "Stars", 95.0),
            TempoEntry::new("Broken Row", "Silence", 0.0),
        ])
    }

    #[test]
    fn lookup_is_substring_and_case_insensitive() {
        let ds = dataset();
        let hit = ds.lookup("deftones", "my own summer").unwrap();
        assert_eq!(hit.tempo, 92.0);
        assert!(ds.lookup("Hum", "Summer").is_none());
    }

    #[test]
    fn within_skips_zero_tempo_and_keeps_order() {
        let ds = dataset();
        let hits: Vec<_> = ds.within(93.0, 5.0).map(|(e, d)| (e.title.as_str(), d)).collect();
        assert_eq!(hits, vec![("My Own Summer (Shove It)", 1.0), ("Stars", 2.0)]);

        assert_eq!(ds.within(2.0, 5.0).count(), 0);
    }

    #[test]
    fn load_accepts_bpm_alias() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracks.json");
        std::fs::write(
            &path,
            r#"[{"artist":"Hum","title":"Stars","bpm":95,"id":"4x"},{"artist":"Failure","title":"Another Space Song","tempo":120.5}]"#,
        )
        .unwrap();

        let ds = TempoDataset::load(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.entries()[0].id.as_deref(), Some("4x"));
        assert_eq!(ds.entries()[1].tempo, 120.5);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let ds = TempoDataset::load(dir.path().join("absent.json")).unwrap();
        assert!(ds.is_empty());
    }
}
