use gloo::storage::{LocalStorage, Storage};
use mirage_core::{ProgressStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};

use crate::utils::{LocalOrDefault, StorageKey};

/// The unlocked level index as it sits in `localStorage`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct UnlockedLevel(pub usize);

impl StorageKey for UnlockedLevel {
    const KEY: &'static str = "mirage:progress:v1";
}

/// [`ProgressStore`] backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct LocalProgress;

impl ProgressStore for LocalProgress {
    fn load_unlocked(&self) -> Option<usize> {
        // absent and unreadable both mean "start at the beginning"
        let UnlockedLevel(index) = UnlockedLevel::local_or_default();
        Some(index)
    }

    fn save_unlocked(&mut self, index: usize) -> StoreResult<()> {
        LocalStorage::set(UnlockedLevel::KEY, UnlockedLevel(index))
            .map_err(|err| StoreError::Write(err.to_string()))
    }
}

impl LocalProgress {
    /// Forgets all progress, used by the "start over" button on the map.
    pub(crate) fn clear() {
        UnlockedLevel::default().local_save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_uses_versioned_namespace() {
        assert_eq!(<UnlockedLevel as StorageKey>::KEY, "mirage:progress:v1");
    }

    #[test]
    fn stored_value_is_a_bare_integer() {
        assert_eq!(serde_json::to_string(&UnlockedLevel(3)).unwrap(), "3");
        assert_eq!(
            serde_json::from_str::<UnlockedLevel>("12").unwrap(),
            UnlockedLevel(12)
        );
    }
}
