use crate::context::*;
use crate::error::*;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Trait for providing context stores to the scorer.
/// Implementations exist for in-memory (tests, embedding) and on-disk use.
pub trait ContextSource {
    fn load(&self, place: &str, period: &str) -> Result<ContextStore>;
}

/// Serves one raw mapping for every period.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    raw: RawContextStore,
}

impl InMemorySource {
    pub fn new(raw: RawContextStore) -> Self {
        InMemorySource { raw }
    }
}

impl ContextSource for InMemorySource {
    fn load(&self, place: &str, period: &str) -> Result<ContextStore> {
        ContextStore::from_raw(place, period, self.raw.clone())
    }
}

/// Reads `<root>/<period>.json`, one file per period.
#[derive(Clone, Debug)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDirectorySource { root: root.into() }
    }

    pub fn path_for(&self, period: &str) -> PathBuf {
        self.root.join(format!("{}.json", period))
    }
}

impl ContextSource for JsonDirectorySource {
    fn load(&self, place: &str, period: &str) -> Result<ContextStore> {
        let file = File::open(self.path_for(period))?;
        ContextStore::from_reader(place, period, BufReader::new(file))
    }
}
