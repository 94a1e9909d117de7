//! Persistent storage for charts

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::charts::{Chart, Radix};
use crate::error::{AstrologerError, Result};

/// Storage backend for birth charts, mirrored to a JSON file
pub struct Storage {
    charts: RwLock<HashMap<String, Radix>>,
    storage_path: PathBuf,
}

impl Storage {
    /// Open the store at `storage_path`, reading it when it exists
    pub fn open(storage_path: impl Into<PathBuf>) -> Result<Self> {
        let storage_path = storage_path.into();

        // Ensure directory exists
        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let charts: HashMap<String, Radix> = if storage_path.exists() {
            let data = fs::read_to_string(&storage_path)?;
            serde_json::from_str(&data)?
        } else {
            HashMap::new()
        };

        tracing::info!(
            path = %storage_path.display(),
            charts = charts.len(),
            "Chart storage opened"
        );

        Ok(Self {
            charts: RwLock::new(charts),
            storage_path,
        })
    }

    /// Save a chart, replacing any chart of the same name
    ///
    /// The in-memory store is left unchanged when the write to disk fails.
    pub fn save_chart(&self, chart: Radix) -> Result<()> {
        let mut charts = self.charts.write().map_err(|_| AstrologerError::LockPoisoned)?;
        let name = chart.name().to_string();
        let previous = charts.insert(name.clone(), chart);

        if let Err(e) = self.persist(&charts) {
            match previous {
                Some(chart) => charts.insert(name, chart),
                None => charts.remove(&name),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Get a chart by name
    pub fn get_chart(&self, name: &str) -> Result<Radix> {
        let charts = self.charts.read().map_err(|_| AstrologerError::LockPoisoned)?;
        charts
            .get(name)
            .cloned()
            .ok_or_else(|| AstrologerError::ChartNotFound(name.to_string()))
    }

    /// List all stored chart names, sorted
    pub fn list_charts(&self) -> Result<Vec<String>> {
        let charts = self.charts.read().map_err(|_| AstrologerError::LockPoisoned)?;
        let mut names: Vec<String> = charts.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Names containing `query`, case-insensitive
    pub fn search_charts(&self, query: &str) -> Result<Vec<String>> {
        let query = query.to_lowercase();
        Ok(self
            .list_charts()?
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect())
    }

    /// Delete a chart by name, returning whether it existed
    pub fn delete_chart(&self, name: &str) -> Result<bool> {
        let mut charts = self.charts.write().map_err(|_| AstrologerError::LockPoisoned)?;
        let Some(chart) = charts.remove(name) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&charts) {
            charts.insert(name.to_string(), chart);
            return Err(e);
        }
        Ok(true)
    }

    /// Write charts to disk
    fn persist(&self, charts: &HashMap<String, Radix>) -> Result<()> {
        let data = serde_json::to_string_pretty(charts)?;
        fs::write(&self.storage_path, data)?;
        tracing::debug!(charts = charts.len(), "Charts persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Place, Settings};
    use crate::ephemeris::djd_to_julian_day;
    use tempfile::TempDir;

    fn chart(name: &str) -> Radix {
        let place = Place {
            name: "Moscow".to_string(),
            latitude: 55.75,
            longitude: 37.58,
        };
        Radix::new(name, djd_to_julian_day(23772.990277), place, Settings::default()).unwrap()
    }

    #[test]
    fn test_save_and_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("charts.json");

        let storage = Storage::open(&path).unwrap();
        storage.save_chart(chart("Alice")).unwrap();
        drop(storage);

        let reopened = Storage::open(&path).unwrap();
        let loaded = reopened.get_chart("Alice").unwrap();
        let fresh = chart("Alice");
        assert_eq!(loaded.houses(), fresh.houses());
        assert_eq!(loaded.objects(), fresh.objects());
    }

    #[test]
    fn test_list_search_delete() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(tmp.path().join("charts.json")).unwrap();
        storage.save_chart(chart("Bob")).unwrap();
        storage.save_chart(chart("Alice")).unwrap();
        storage.save_chart(chart("Alicia")).unwrap();

        assert_eq!(storage.list_charts().unwrap(), vec!["Alice", "Alicia", "Bob"]);
        assert_eq!(storage.search_charts("ALI").unwrap(), vec!["Alice", "Alicia"]);

        assert!(storage.delete_chart("Bob").unwrap());
        assert!(!storage.delete_chart("Bob").unwrap());
        assert!(matches!(
            storage.get_chart("Bob"),
            Err(AstrologerError::ChartNotFound(_))
        ));
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("charts.json");
        let storage = Storage::open(&path).unwrap();

        // a directory in place of the file makes every write fail
        fs::create_dir(&path).unwrap();

        assert!(matches!(
            storage.save_chart(chart("Alice")),
            Err(AstrologerError::Io(_))
        ));
        assert!(storage.list_charts().unwrap().is_empty());
        assert!(matches!(
            storage.get_chart("Alice"),
            Err(AstrologerError::ChartNotFound(_))
        ));
    }

    #[test]
    fn test_failed_delete_keeps_chart() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("charts.json");
        let storage = Storage::open(&path).unwrap();
        storage.save_chart(chart("Alice")).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(storage.delete_chart("Alice").is_err());
        assert_eq!(storage.list_charts().unwrap(), vec!["Alice"]);
    }

    #[test]
    fn test_failed_overwrite_keeps_previous_chart() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("charts.json");
        let storage = Storage::open(&path).unwrap();
        storage.save_chart(chart("Alice")).unwrap();
        let before = storage.get_chart("Alice").unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let moved = Radix::new(
            "Alice",
            djd_to_julian_day(23772.990277),
            Place {
                name: "Paris".to_string(),
                latitude: 48.85,
                longitude: 2.35,
            },
            Settings::default(),
        )
        .unwrap();
        assert!(storage.save_chart(moved).is_err());
        assert_eq!(storage.get_chart("Alice").unwrap().place(), before.place());
    }
}
