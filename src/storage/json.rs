use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::{ChannelRecord, Registry};
use crate::errors::{TrackerError, TrackerResult};
use crate::storage::traits::ChannelRepository;

/// Whole-file JSON snapshot store: an object mapping alias to channel record.
///
/// Every mutation rewrites the complete snapshot, and read-modify-write
/// sequences are serialized behind a mutex shared by clones, so concurrent
/// registrations cannot interleave and lose an update.
#[derive(Clone)]
pub struct JsonRegistryStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonRegistryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn guard(&self) -> TrackerResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| TrackerError::Persistence("registry lock poisoned".to_string()))
    }

    fn read_registry(&self) -> TrackerResult<Registry> {
        if !self.path.exists() {
            return Ok(Registry::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents)
            .map_err(|e| TrackerError::CorruptStore(format!("{}: {}", self.path.display(), e)))
    }

    fn write_registry(&self, registry: &Registry) -> TrackerResult<()> {
        let contents = serde_json::to_string_pretty(registry)
            .map_err(|e| TrackerError::Persistence(e.to_string()))?;

        fs::write(&self.path, contents)
            .map_err(|e| TrackerError::Persistence(format!("{}: {}", self.path.display(), e)))
    }
}

impl ChannelRepository for JsonRegistryStore {
    fn load_all(&self) -> TrackerResult<Registry> {
        let _guard = self.guard()?;
        self.read_registry()
    }

    fn register(
        &self,
        alias: &str,
        record: ChannelRecord,
        overwrite: bool,
    ) -> TrackerResult<String> {
        let alias = alias.trim().to_lowercase();
        if alias.is_empty() {
            return Err(TrackerError::InvalidInput(
                "alias must not be empty".to_string(),
            ));
        }

        let _guard = self.guard()?;
        let mut registry = self.read_registry()?;

        // Channel identity is unique regardless of alias and is never
        // overridable, not even with overwrite.
        for (existing_alias, existing) in &registry {
            if existing.channel_id == record.channel_id {
                return Err(TrackerError::DuplicateChannel(existing_alias.clone()));
            }
        }

        if registry.contains_key(&alias) && !overwrite {
            return Err(TrackerError::DuplicateAlias(alias));
        }

        registry.insert(alias.clone(), record);
        self.write_registry(&registry)?;

        Ok(alias)
    }

    fn update_last_seen(&self, alias: &str, video_id: &str) -> TrackerResult<()> {
        let alias = alias.to_lowercase();

        let _guard = self.guard()?;
        let mut registry = self.read_registry()?;

        let record = registry
            .get_mut(&alias)
            .ok_or(TrackerError::UnknownAlias(alias))?;
        record.last_video_id = Some(video_id.to_string());

        self.write_registry(&registry)
    }

    fn all_channels(&self) -> TrackerResult<Vec<(String, String)>> {
        let registry = self.load_all()?;

        Ok(registry
            .into_iter()
            .map(|(alias, record)| (alias, record.channel_name))
            .collect())
    }
}
