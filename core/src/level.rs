use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Largest side length whose cells still fit in a [`Cell`].
pub const MAX_GRID_SIZE: u8 = 15;

const fn default_grid_size() -> u8 {
    GRID_SIZE
}

/// Level exactly as it appears in the data file, with 1-based cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level: u32,
    pub sequence: Vec<u32>,
    #[serde(default)]
    pub hint: String,
    #[serde(default = "default_grid_size")]
    pub grid_size: u8,
}

/// Validated level with a 0-based sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    index: usize,
    display_number: u32,
    grid_size: u8,
    sequence: Sequence,
    hint: String,
}

impl Level {
    pub fn from_record(index: usize, record: &LevelRecord) -> Result<Self> {
        let LevelRecord {
            level,
            sequence,
            hint,
            grid_size,
        } = record;
        let (level, grid_size) = (*level, *grid_size);

        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(DataError::InvalidGridSize { level, grid_size });
        }

        if sequence.len() != SEQUENCE_LEN {
            return Err(DataError::SequenceLength {
                level,
                expected: SEQUENCE_LEN,
                found: sequence.len(),
            });
        }

        let cells = cell_count(grid_size);
        let sequence = sequence
            .iter()
            .map(|&one_based| match one_based {
                0 => Err(DataError::ZeroCell { level }),
                n if n > u32::from(cells) => Err(DataError::CellOutOfRange {
                    level,
                    cell: n - 1,
                    cells,
                }),
                // bounded by cells <= 225 above
                n => Ok((n - 1) as Cell),
            })
            .collect::<Result<Sequence>>()?;

        Ok(Self {
            index,
            display_number: level,
            grid_size,
            sequence,
            hint: hint.clone(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display_number(&self) -> u32 {
        self.display_number
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    pub fn cell_count(&self) -> u16 {
        cell_count(self.grid_size)
    }

    pub fn sequence(&self) -> &[Cell] {
        &self.sequence
    }

    /// Cells shown to the player during the reveal phase.
    pub fn shown(&self) -> &[Cell] {
        &self.sequence[..INITIAL_DOTS]
    }

    /// Cells the player must reproduce, in order.
    pub fn to_guess(&self) -> &[Cell] {
        &self.sequence[INITIAL_DOTS..]
    }

    pub fn guess_target(&self, cursor: usize) -> Option<Cell> {
        self.to_guess().get(cursor).copied()
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }
}

pub fn levels_from_records(records: &[LevelRecord]) -> Result<Vec<Level>> {
    if records.is_empty() {
        return Err(DataError::NoLevels);
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| Level::from_record(index, record))
        .collect()
}

/// Parses and validates the JSON level list.
pub fn load_levels(json: &str) -> Result<Vec<Level>> {
    let records: Vec<LevelRecord> =
        serde_json::from_str(json).map_err(|err| DataError::Malformed(err.to_string()))?;
    let levels = levels_from_records(&records)?;
    log::debug!("loaded {} levels", levels.len());
    Ok(levels)
}
