//! Record sources for the document generator.
//!
//! The generator only needs one question answered: "which shipment has this
//! tracking number?". The [`RecordSource`] trait captures that, so the same
//! pipeline can read from memory, a JSON export or a database.
//!
//! ## Available Sources
//!
//! - `InMemoryRecordSource`: records held in a map, for tests and embedding
//! - `JsonFileRecordSource`: an exported JSON file, loaded on open

use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use waybill_types::ShipmentRecord;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read record file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid record data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

/// Looks shipments up by tracking number.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the record whose tracking number equals `code`.
    ///
    /// With `case_insensitive`, an exact match still wins; otherwise the
    /// first record matching under ASCII case folding is returned.
    async fn find_by_tracking_number(
        &self,
        code: &str,
        case_insensitive: bool,
    ) -> Result<Option<ShipmentRecord>, SourceError>;

    /// Number of records available, if the source knows it.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// Records kept in memory, keyed by tracking number.
#[derive(Debug, Default)]
pub struct InMemoryRecordSource {
    records: RwLock<HashMap<String, ShipmentRecord>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ShipmentRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.tracking_number.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }

    /// Adds `record`, replacing any record with the same tracking number.
    pub fn insert(&self, record: ShipmentRecord) -> Result<(), SourceError> {
        let mut records = self.records.write().map_err(|e| SourceError::Unavailable(e.to_string()))?;
        records.insert(record.tracking_number.clone(), record);
        Ok(())
    }

    /// Swaps the whole record set in one step.
    pub fn replace_all(&self, records: Vec<ShipmentRecord>) -> Result<usize, SourceError> {
        let map: HashMap<_, _> = records
            .into_iter()
            .map(|r| (r.tracking_number.clone(), r))
            .collect();
        let count = map.len();
        *self.records.write().map_err(|e| SourceError::Unavailable(e.to_string()))? = map;
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, code: &str, case_insensitive: bool) -> Result<Option<ShipmentRecord>, SourceError> {
        let records = self.records.read().map_err(|e| SourceError::Unavailable(e.to_string()))?;
        if let Some(record) = records.get(code) {
            return Ok(Some(record.clone()));
        }
        if !case_insensitive {
            return Ok(None);
        }
        // Several stored numbers can fold to the same key; pick the smallest
        // so the answer does not depend on map iteration order.
        let found = records
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(code))
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, record)| record.clone());
        if found.is_some() {
            debug!("Tracking number '{}' matched case-insensitively.", code);
        }
        Ok(found)
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn find_by_tracking_number(
        &self,
        code: &str,
        case_insensitive: bool,
    ) -> Result<Option<ShipmentRecord>, SourceError> {
        self.lookup(code, case_insensitive)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Parses an array of records or a single record object. The shape is picked
/// from the first non-whitespace byte so serde reports the real fault.
fn parse_records(bytes: &[u8]) -> Result<Vec<ShipmentRecord>, serde_json::Error> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => serde_json::from_slice(bytes),
        _ => serde_json::from_slice::<ShipmentRecord>(bytes).map(|record| vec![record]),
    }
}

/// Records exported to a JSON file: either an array of records or a single
/// record object.
#[derive(Debug)]
pub struct JsonFileRecordSource {
    path: PathBuf,
    inner: InMemoryRecordSource,
}

impl JsonFileRecordSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let source = Self {
            path: path.as_ref().to_path_buf(),
            inner: InMemoryRecordSource::new(),
        };
        source.reload().await?;
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file. On error the previously loaded records stay in place.
    pub async fn reload(&self) -> Result<usize, SourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let records = parse_records(&bytes)?;
        let count = self.inner.replace_all(records)?;
        info!("Loaded {} shipment record(s) from {}.", count, self.path.display());
        Ok(count)
    }
}

#[async_trait]
impl RecordSource for JsonFileRecordSource {
    async fn find_by_tracking_number(
        &self,
        code: &str,
        case_insensitive: bool,
    ) -> Result<Option<ShipmentRecord>, SourceError> {
        self.inner.lookup(code, case_insensitive)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.inner.len())
    }
}
