//! URL mapping manager: the routing table and the union-of-matches resolution.

use crate::config::RoutingConfig;
use crate::mapping::UrlExtractorMapping;
use crate::RouterError;
use std::path::Path;
use tracing::{debug, info};
use urlsift_domain::ExtractorConfig;

/// Priority-ordered routing table
///
/// Mappings are kept sorted by priority, highest first; equal priorities
/// keep their insertion order. The manager is a plain value: callers that
/// share it across tasks serialize writes themselves (e.g. behind a
/// `RwLock`).
#[derive(Debug, Clone, Default)]
pub struct UrlMappingManager {
    mappings: Vec<UrlExtractorMapping>,
}

impl UrlMappingManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager from a persisted routing document
    pub fn from_config(config: RoutingConfig) -> Result<Self, RouterError> {
        let mappings = config
            .mappings
            .into_iter()
            .map(UrlExtractorMapping::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut manager = Self { mappings };
        manager.sort();
        Ok(manager)
    }

    /// Persisted form of the current table, in priority order
    pub fn to_config(&self) -> RoutingConfig {
        RoutingConfig {
            mappings: self.mappings.iter().map(UrlExtractorMapping::to_spec).collect(),
        }
    }

    /// Insert a mapping and restore priority order
    pub fn add_mapping(&mut self, mapping: UrlExtractorMapping) {
        debug!(
            "Adding {} mapping '{}' (priority {})",
            mapping.pattern_type(),
            mapping.pattern(),
            mapping.priority()
        );
        self.mappings.push(mapping);
        self.sort();
    }

    /// Remove the first mapping equal to `mapping`
    ///
    /// Returns `false` (and changes nothing) if no such mapping exists.
    pub fn remove_mapping(&mut self, mapping: &UrlExtractorMapping) -> bool {
        match self.mappings.iter().position(|m| m == mapping) {
            Some(index) => {
                self.mappings.remove(index);
                true
            }
            None => false,
        }
    }

    /// Collect the extractors of every mapping matching `url`
    ///
    /// Higher-priority mappings contribute first; each mapping's extractors
    /// keep their order. Nothing is deduplicated, since two mappings may
    /// feed different target groups with the same extractor. An empty result
    /// means no extraction is possible for the URL.
    pub fn resolve_all_extractors(&self, url: &str) -> Vec<ExtractorConfig> {
        let extractors: Vec<ExtractorConfig> = self
            .mappings
            .iter()
            .filter(|m| m.matches(url))
            .flat_map(|m| m.extractors().iter().cloned())
            .collect();

        debug!("Resolved {} extractors for {}", extractors.len(), url);
        extractors
    }

    /// The mappings, highest priority first
    pub fn mappings(&self) -> &[UrlExtractorMapping] {
        &self.mappings
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Drop every mapping
    pub fn clear(&mut self) {
        self.mappings.clear();
    }

    /// Write the table to a JSON file
    pub fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), RouterError> {
        let path = path.as_ref();
        self.to_config().to_file(path)?;
        info!("Saved {} mappings to {}", self.mappings.len(), path.display());
        Ok(())
    }

    /// Replace the table with the contents of a JSON file
    ///
    /// The file is parsed and every pattern compiled before anything is
    /// replaced, so a failed load leaves the current table untouched.
    /// Returns the number of mappings loaded.
    pub fn load_config<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RouterError> {
        let path = path.as_ref();
        let loaded = Self::from_config(RoutingConfig::from_file(path)?)?;
        *self = loaded;
        info!("Loaded {} mappings from {}", self.mappings.len(), path.display());
        Ok(self.mappings.len())
    }

    // Vec::sort_by is stable: equal priorities keep insertion order
    fn sort(&mut self) {
        self.mappings.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }
}
