use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Persistence for the single "unlocked level index" value.
///
/// Reads happen when a round is resumed, writes when a round is won. Writes
/// are fire-and-forget: the ladder logs failures and carries on.
pub trait ProgressStore {
    fn load_unlocked(&self) -> Option<usize>;
    fn save_unlocked(&mut self, index: usize) -> StoreResult<()>;
}

/// In-memory store, the default for tests and headless use.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    unlocked: Option<usize>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unlocked(index: usize) -> Self {
        Self {
            unlocked: Some(index),
            ..Self::default()
        }
    }

    /// Store whose writes always fail, for exercising the error path.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn unlocked(&self) -> Option<usize> {
        self.unlocked
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ProgressStore for MemoryStore {
    fn load_unlocked(&self) -> Option<usize> {
        self.unlocked
    }

    fn save_unlocked(&mut self, index: usize) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.unlocked = Some(index);
        self.writes += 1;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Completed,
    Current,
    Locked,
}

impl LevelStatus {
    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Locked)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level_index: usize,
    pub display_number: u32,
    pub status: LevelStatus,
}

/// Status of every level given the unlocked index. A level is completed when
/// its display number is below `unlocked_index + 1` and current when equal.
pub fn compute_status(levels: &[Level], unlocked_index: usize) -> Vec<LevelProgress> {
    let current_number = u32::try_from(unlocked_index)
        .unwrap_or(u32::MAX)
        .saturating_add(1);

    levels
        .iter()
        .enumerate()
        .map(|(level_index, level)| {
            let display_number = level.display_number();
            let status = match display_number.cmp(&current_number) {
                core::cmp::Ordering::Less => LevelStatus::Completed,
                core::cmp::Ordering::Equal => LevelStatus::Current,
                core::cmp::Ordering::Greater => LevelStatus::Locked,
            };
            LevelProgress {
                level_index,
                display_number,
                status,
            }
        })
        .collect()
}

/// Index of the level after `current` on a ladder of `len` levels.
pub const fn advance_index(current: usize, len: usize, policy: AdvancePolicy) -> usize {
    if len == 0 {
        return 0;
    }
    match policy {
        AdvancePolicy::Cap => {
            let next = current.saturating_add(1);
            if next < len { next } else { len - 1 }
        }
        AdvancePolicy::Wrap => (current % len + 1) % len,
    }
}

/// Index reached by stepping one level in `direction`.
pub const fn navigate_index(
    current: usize,
    len: usize,
    direction: Direction,
    policy: NavigationPolicy,
) -> usize {
    if len == 0 {
        return 0;
    }
    let current = if current < len { current } else { len - 1 };
    match (direction, policy) {
        (Direction::Previous, NavigationPolicy::Clamp | NavigationPolicy::ClampStart) => {
            current.saturating_sub(1)
        }
        (Direction::Previous, NavigationPolicy::Wrap) => (current + len - 1) % len,
        (Direction::Next, NavigationPolicy::Clamp) => {
            if current + 1 < len {
                current + 1
            } else {
                current
            }
        }
        (Direction::Next, NavigationPolicy::Wrap | NavigationPolicy::ClampStart) => {
            (current + 1) % len
        }
    }
}

/// Ordered, non-empty level list together with the player's stored progress.
#[derive(Clone, Debug, PartialEq)]
pub struct Ladder<S> {
    levels: Vec<Level>,
    store: S,
}

impl<S: ProgressStore> Ladder<S> {
    pub fn new(levels: Vec<Level>, store: S) -> Result<Self> {
        if levels.is_empty() {
            return Err(DataError::NoLevels);
        }
        Ok(Self { levels, store })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Clamps an arbitrary index onto the ladder.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    pub fn level(&self, index: usize) -> &Level {
        &self.levels[self.clamp_index(index)]
    }

    /// Stored unlocked index, or 0 when absent or no longer on the ladder.
    pub fn unlocked_index(&self) -> usize {
        match self.store.load_unlocked() {
            Some(index) if index < self.levels.len() => index,
            Some(index) => {
                log::debug!("stored level {} is out of range, starting over", index);
                0
            }
            None => 0,
        }
    }

    pub fn advance(&self, current: usize, policy: AdvancePolicy) -> usize {
        advance_index(current, self.levels.len(), policy)
    }

    pub fn navigate(&self, current: usize, direction: Direction, policy: NavigationPolicy) -> usize {
        navigate_index(current, self.levels.len(), direction, policy)
    }

    /// Persists `index` as the unlocked level.
    pub fn record_progress(&mut self, index: usize) {
        let index = self.clamp_index(index);
        log::debug!("unlocked level index: {}", index);
        if let Err(err) = self.store.save_unlocked(index) {
            log::warn!("failed to save progress: {}", err);
        }
    }

    /// Starts a new playthrough from the first level.
    pub fn reset(&mut self) {
        self.record_progress(0);
    }

    pub fn status(&self) -> Vec<LevelProgress> {
        compute_status(&self.levels, self.unlocked_index())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn levels(count: u32) -> Vec<Level> {
        let records: Vec<_> = (1..=count)
            .map(|level| LevelRecord {
                level,
                sequence: vec![1, 2, 3, 4, 5, 6, 7],
                hint: String::new(),
                grid_size: GRID_SIZE,
            })
            .collect();
        levels_from_records(&records).unwrap()
    }

    #[test]
    fn empty_ladder_is_rejected() {
        assert_eq!(
            Ladder::new(Vec::new(), MemoryStore::new()).unwrap_err(),
            DataError::NoLevels
        );
    }

    #[test]
    fn unlocked_index_defaults_and_clamps_to_zero() {
        assert_eq!(Ladder::new(levels(3), MemoryStore::new()).unwrap().unlocked_index(), 0);
        assert_eq!(
            Ladder::new(levels(3), MemoryStore::with_unlocked(2))
                .unwrap()
                .unlocked_index(),
            2
        );
        assert_eq!(
            Ladder::new(levels(3), MemoryStore::with_unlocked(7))
                .unwrap()
                .unlocked_index(),
            0
        );
    }

    #[test]
    fn advance_caps_or_wraps_at_the_end() {
        assert_eq!(advance_index(0, 3, AdvancePolicy::Cap), 1);
        assert_eq!(advance_index(2, 3, AdvancePolicy::Cap), 2);
        assert_eq!(advance_index(1, 3, AdvancePolicy::Wrap), 2);
        assert_eq!(advance_index(2, 3, AdvancePolicy::Wrap), 0);
        assert_eq!(advance_index(0, 1, AdvancePolicy::Wrap), 0);
    }

    #[test]
    fn navigation_clamps_or_wraps_at_both_ends() {
        use Direction::*;
        use NavigationPolicy::*;

        assert_eq!(navigate_index(0, 3, Previous, Clamp), 0);
        assert_eq!(navigate_index(2, 3, Next, Clamp), 2);
        assert_eq!(navigate_index(0, 3, Previous, Wrap), 2);
        assert_eq!(navigate_index(2, 3, Next, Wrap), 0);
        assert_eq!(navigate_index(1, 3, Next, Clamp), 2);
        assert_eq!(navigate_index(0, 3, Previous, ClampStart), 0);
        assert_eq!(navigate_index(2, 3, Previous, ClampStart), 1);
        assert_eq!(navigate_index(2, 3, Next, ClampStart), 0);
    }

    #[test]
    fn status_marks_completed_current_and_locked() {
        let status = compute_status(&levels(4), 2);
        let kinds: Vec<_> = status.iter().map(|progress| progress.status).collect();

        assert_eq!(
            kinds,
            vec![
                LevelStatus::Completed,
                LevelStatus::Completed,
                LevelStatus::Current,
                LevelStatus::Locked
            ]
        );
        assert!(status[2].status.is_playable());
        assert!(!status[3].status.is_playable());
        assert_eq!(status[3].display_number, 4);
    }

    #[test]
    fn record_progress_writes_through_and_reset_returns_to_start() {
        let mut ladder = Ladder::new(levels(3), MemoryStore::new()).unwrap();

        ladder.record_progress(2);
        assert_eq!(ladder.unlocked_index(), 2);

        ladder.reset();
        assert_eq!(ladder.unlocked_index(), 0);
        assert_eq!(ladder.store().write_count(), 2);
    }

    #[test]
    fn failed_writes_do_not_panic() {
        let mut ladder = Ladder::new(levels(2), MemoryStore::failing()).unwrap();

        ladder.record_progress(1);

        assert_eq!(ladder.unlocked_index(), 0);
    }
}
