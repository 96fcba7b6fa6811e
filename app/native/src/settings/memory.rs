//! In-memory settings store, seeded and refreshed from the config file.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use super::{SettingKey, SettingsSchema, SettingsStore};
use crate::error::DotspacesError;
use crate::signals::{ConnectionId, SignalArgs, SignalCallback, SignalEmitter, SignalSource};

/// A [`SettingsStore`] kept in memory.
///
/// `changed::<key>` is emitted only when a write actually changes the value.
pub struct MemorySettingsStore {
    schema: SettingsSchema,
    values: RwLock<HashMap<SettingKey, bool>>,
    emitter: SignalEmitter,
}

impl MemorySettingsStore {
    /// Creates a store holding the default value of every key in `schema`.
    #[must_use]
    pub fn new(schema: SettingsSchema) -> Self {
        let values = SettingKey::for_schema(schema).map(|key| (key, key.default_value())).collect();
        Self {
            schema,
            values: RwLock::new(values),
            emitter: SignalEmitter::new(),
        }
    }

    /// Creates a store with `values` applied over the defaults.
    ///
    /// Keys from other schemas are ignored.
    #[must_use]
    pub fn with_values(
        schema: SettingsSchema,
        values: impl IntoIterator<Item = (SettingKey, bool)>,
    ) -> Self {
        let store = Self::new(schema);
        {
            let mut current = store.values.write();
            for (key, value) in values {
                if key.schema() == schema {
                    current.insert(key, value);
                }
            }
        }
        store
    }

    /// Applies several values at once, notifying each key that changed.
    ///
    /// Keys from other schemas are skipped. Returns the number of keys that
    /// changed.
    pub fn apply(&self, values: impl IntoIterator<Item = (SettingKey, bool)>) -> usize {
        let mut changed = 0;
        for (key, value) in values {
            if key.schema() == self.schema && self.store(key, value) {
                changed += 1;
            }
        }
        changed
    }

    /// Number of connected handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize { self.emitter.handler_count() }

    /// Writes a value and emits the change signal if it differs.
    fn store(&self, key: SettingKey, value: bool) -> bool {
        let previous = self.values.write().insert(key, value);
        if previous == Some(value) {
            return false;
        }
        tracing::debug!(key = %key, value, "setting changed");
        self.emitter.emit(&key.changed_signal(), &SignalArgs::None);
        true
    }
}

impl SignalSource for MemorySettingsStore {
    fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
        self.emitter.connect(event, callback)
    }

    fn disconnect(&self, id: ConnectionId) -> bool { self.emitter.disconnect(id) }
}

impl SettingsStore for MemorySettingsStore {
    fn schema(&self) -> SettingsSchema { self.schema }

    fn get_bool(&self, key: SettingKey) -> bool {
        self.values.read().get(&key).copied().unwrap_or_else(|| key.default_value())
    }

    fn set_bool(&self, key: SettingKey, value: bool) -> Result<(), DotspacesError> {
        if key.schema() != self.schema {
            return Err(DotspacesError::SettingsError(format!(
                "key {key} is not part of schema {}",
                self.schema.id()
            )));
        }
        self.store(key, value);
        Ok(())
    }
}

impl fmt::Debug for MemorySettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySettingsStore")
            .field("schema", &self.schema)
            .field("values", &*self.values.read())
            .finish_non_exhaustive()
    }
}
