//! Code Clicker save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current format version. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest version still loadable. Only bump it
//!   when an existing field changes meaning or is removed.
//!
//! Loading is best effort. Missing fields take their defaults, and a field
//! that is present but malformed falls back to its default on its own
//! without failing the rest of the save. Semantic checks (unknown ids, caps,
//! negative totals) happen later in `ProgressionState::restore`.
//!
//! A blob with no version envelope is a legacy save: one flat JSON object
//! holding the whole game state.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::error::SaveError;
use super::state::Snapshot;

/// Current save format version.
const SAVE_VERSION: u32 = 1;

/// Oldest save version that can still be loaded.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key. Legacy saves live under the same key.
#[cfg(target_arch = "wasm32")]
pub const STORAGE_KEY: &str = "8bitProgrammingClicker";

/// Autosave cadence in seconds of elapsed play time.
pub const AUTOSAVE_INTERVAL_SECS: f64 = 60.0;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    #[serde(deserialize_with = "lenient")]
    resource_total: f64,
    #[serde(deserialize_with = "lenient")]
    currency_total: f64,
    #[serde(deserialize_with = "lenient")]
    resource_per_click: f64,
    #[serde(deserialize_with = "lenient")]
    resource_per_second: f64,
    #[serde(deserialize_with = "lenient")]
    currency_per_resource_unit: f64,
    #[serde(deserialize_with = "lenient_levels")]
    item_levels: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient")]
    last_persist_timestamp: f64,
    #[serde(deserialize_with = "lenient")]
    total_clicks: u64,
}

/// Deserialize a field, falling back to its default when the value has the
/// wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring malformed save field");
        T::default()
    }))
}

/// Item levels are merged entry by entry; entries that are not a valid
/// level are skipped.
fn lenient_levels<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(entries) = value else {
        warn!("ignoring malformed item_levels");
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(id, level)| match as_level(&level) {
            Some(level) => Some((id, level)),
            None => {
                warn!(item_id = %id, "ignoring malformed item level");
                None
            }
        })
        .collect())
}

fn as_level(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|l| u32::try_from(l).ok())
}

fn extract_save(snapshot: &Snapshot) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            resource_total: snapshot.resource_total,
            currency_total: snapshot.currency_total,
            resource_per_click: snapshot.resource_per_click,
            resource_per_second: snapshot.resource_per_second,
            currency_per_resource_unit: snapshot.currency_per_resource_unit,
            item_levels: snapshot.item_levels.clone(),
            last_persist_timestamp: snapshot.last_persist_timestamp,
            total_clicks: snapshot.total_clicks,
        },
    }
}

impl From<GameSave> for Snapshot {
    fn from(save: GameSave) -> Self {
        Snapshot {
            resource_total: save.resource_total,
            currency_total: save.currency_total,
            resource_per_click: save.resource_per_click,
            resource_per_second: save.resource_per_second,
            currency_per_resource_unit: save.currency_per_resource_unit,
            item_levels: save.item_levels,
            last_persist_timestamp: save.last_persist_timestamp,
            total_clicks: save.total_clicks,
        }
    }
}

/// Serialize a snapshot into a save blob.
pub fn encode(snapshot: &Snapshot) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(snapshot))?)
}

/// Parse a save blob. Returns `None` only when nothing usable is in it:
/// not JSON, not an object, or a version older than the compatible minimum.
pub fn decode(blob: &str) -> Option<Snapshot> {
    let value: Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "save blob is not valid JSON");
            return None;
        }
    };
    let Value::Object(root) = value else {
        warn!("save blob is not a JSON object");
        return None;
    };

    let Some(version) = root.get("version") else {
        info!("reading unversioned save as legacy layout");
        return Some(decode_legacy(&root));
    };
    let Some(version) = version.as_u64() else {
        warn!("save version is not a number");
        return None;
    };
    if version < u64::from(MIN_COMPATIBLE_VERSION) {
        warn!(
            saved = version,
            min_compatible = MIN_COMPATIBLE_VERSION,
            "save version too old"
        );
        return None;
    }
    if version < u64::from(SAVE_VERSION) {
        info!(saved = version, current = SAVE_VERSION, "migrating older save");
    }

    let game = match root.get("game") {
        Some(game @ Value::Object(_)) => game,
        _ => {
            warn!("save has no game object");
            return None;
        }
    };
    match GameSave::deserialize(game) {
        Ok(save) => Some(save.into()),
        Err(e) => {
            warn!(error = %e, "unreadable game section");
            None
        }
    }
}

/// Legacy saves hold the whole state object flat: `lines`, `cash`,
/// `lastSaveTime`, and shop arrays whose entries carry `id` and `level`.
fn decode_legacy(root: &Map<String, Value>) -> Snapshot {
    let number = |key: &str| root.get(key).and_then(Value::as_f64).unwrap_or(0.0);

    let mut snapshot = Snapshot {
        resource_total: number("lines"),
        currency_total: number("cash"),
        last_persist_timestamp: number("lastSaveTime"),
        ..Snapshot::default()
    };

    for section in ["upgrades", "programmers", "officeUpgrades"] {
        let Some(Value::Array(entries)) = root.get(section) else {
            continue;
        };
        for entry in entries {
            let id = entry.get("id").and_then(Value::as_str);
            let level = entry.get("level").and_then(as_level);
            if let (Some(id), Some(level)) = (id, level) {
                if level > 0 {
                    snapshot.item_levels.insert(id.to_string(), level);
                }
            }
        }
    }
    snapshot
}

/// Where save blobs live.
pub trait SaveStore {
    fn read(&self) -> Option<String>;
    fn write(&self, blob: &str) -> Result<(), SaveError>;
    fn clear(&self);
}

/// Keeps the blob in memory. Used off-browser and in tests.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn write(&self, blob: &str) -> Result<(), SaveError> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

/// Browser localStorage under a fixed key.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn read(&self) -> Option<String> {
        Self::storage()?.get_item(self.key).ok()?
    }

    fn write(&self, blob: &str) -> Result<(), SaveError> {
        let storage =
            Self::storage().ok_or_else(|| SaveError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(self.key, blob)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(self.key);
        }
    }
}

/// The store for the current platform.
pub fn default_store() -> Box<dyn SaveStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorageStore::new(STORAGE_KEY))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(MemoryStore::default())
    }
}

/// Write a snapshot to `store`.
pub fn save_game(store: &dyn SaveStore, snapshot: &Snapshot) -> Result<(), SaveError> {
    let blob = encode(snapshot)?;
    store.write(&blob)?;
    info!(bytes = blob.len(), "game saved");
    Ok(())
}

/// Read the saved snapshot, if any. A blob that cannot be used is removed so
/// the next start is clean.
pub fn load_game(store: &dyn SaveStore) -> Option<Snapshot> {
    let blob = store.read()?;
    match decode(&blob) {
        Some(snapshot) => {
            info!("save loaded");
            Some(snapshot)
        }
        None => {
            warn!("discarding unusable save");
            store.clear();
            None
        }
    }
}
