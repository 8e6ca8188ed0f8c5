use alloc::string::String;
use thiserror::Error;

/// Problems found while loading level data. Always fatal: the game cannot
/// start without a valid, non-empty ladder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Level data is malformed: {0}")]
    Malformed(String),
    #[error("Level data contains no levels")]
    NoLevels,
    #[error("Level {level} has {found} cells in its sequence, expected {expected}")]
    SequenceLength {
        level: u32,
        expected: usize,
        found: usize,
    },
    #[error("Level {level} references cell {cell}, board only has {cells} cells")]
    CellOutOfRange { level: u32, cell: u32, cells: u16 },
    #[error("Level {level} references cell 0, sequences are 1-based")]
    ZeroCell { level: u32 },
    #[error("Level {level} declares unsupported grid size {grid_size}")]
    InvalidGridSize { level: u32, grid_size: u8 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Progress storage is unavailable")]
    Unavailable,
    #[error("Could not write progress: {0}")]
    Write(String),
}

pub type Result<T> = core::result::Result<T, DataError>;

pub type StoreResult<T> = core::result::Result<T, StoreError>;
