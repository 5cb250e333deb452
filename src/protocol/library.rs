//! Protocol Library
//!
//! The in-memory protocol repository. A library is loaded once at startup, either from
//! the JSON store or from the built-in seed, and then only read from.
//!
//! # Example
//!
//! ```rust,no_run
//! use oncosol::protocol::ProtocolLibrary;
//!
//! let library = ProtocolLibrary::load_or_seed("protocols.json")?;
//!
//! for name in library.list() {
//!     println!("Available: {}", name);
//! }
//! # Ok::<(), oncosol::protocol::ProtocolError>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use super::errors::ProtocolError;
use super::types::Protocol;

/// A registry of protocols keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolLibrary {
    protocols: BTreeMap<String, Protocol>,
}

// Seed store embedded at compile time
mod embedded {
    pub const R_CHOP: &str = include_str!("protocols/r_chop.json");
}

impl ProtocolLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            protocols: BTreeMap::new(),
        }
    }

    /// The built-in seed library (R-CHOP)
    pub fn seed() -> Self {
        match Self::from_str(embedded::R_CHOP) {
            Ok(library) => library,
            Err(e) => {
                tracing::error!("Embedded seed protocol store is invalid: {}", e);
                Self::new()
            }
        }
    }

    /// Parse a protocol store
    ///
    /// The store is a JSON object mapping protocol names to protocol records. A
    /// protocol that fails validation is logged and skipped; the rest still load.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ProtocolError> {
        let raw: BTreeMap<String, Protocol> = serde_json::from_str(json)?;

        let mut library = Self::new();
        for (name, mut protocol) in raw {
            protocol.name = name;
            if let Err(e) = protocol.validate() {
                tracing::warn!(protocol = %protocol.name, "skipping protocol: {}", e);
                continue;
            }
            library.add(protocol);
        }

        Ok(library)
    }

    /// Load a protocol store from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ProtocolError::io(path, e))?;
        let library = Self::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            protocols = library.len(),
            "protocol store loaded"
        );
        Ok(library)
    }

    /// Load the store at `path`, creating it from the seed if it does not exist
    pub fn load_or_seed(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(path = %path.display(), "protocol store missing, writing seed");
            let seed = Self::seed();
            seed.save(path)?;
            return Ok(seed);
        }

        Self::from_file(path)
    }

    /// Serialize the library as a pretty-printed store
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string_pretty(&self.protocols)?)
    }

    /// Write the library to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProtocolError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ProtocolError::io(path, e))
    }

    /// Get a protocol by name
    pub fn get(&self, name: &str) -> Option<&Protocol> {
        self.protocols.get(name)
    }

    /// Get a protocol by name, failing if absent
    pub fn require(&self, name: &str) -> Result<&Protocol, ProtocolError> {
        self.get(name)
            .ok_or_else(|| ProtocolError::NotFound(name.to_string()))
    }

    /// Check if a protocol exists
    pub fn contains(&self, name: &str) -> bool {
        self.protocols.contains_key(name)
    }

    /// Add a protocol, replacing any protocol with the same name
    pub fn add(&mut self, protocol: Protocol) {
        self.protocols.insert(protocol.name.clone(), protocol);
    }

    /// List all protocol names, sorted
    pub fn list(&self) -> Vec<&str> {
        self.protocols.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    /// Search protocols by case-insensitive partial name match
    pub fn search(&self, query: &str) -> Vec<&Protocol> {
        let query_lower = query.to_lowercase();
        self.protocols
            .values()
            .filter(|protocol| protocol.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protocol> {
        self.protocols.values()
    }
}
