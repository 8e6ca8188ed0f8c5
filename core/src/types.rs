use smallvec::SmallVec;

/// Cell position on the board, 0-based and row-major.
pub type Cell = u8;

/// Side length of the square board used by every shipped level.
pub const GRID_SIZE: u8 = 7;

/// Number of cells shown during the reveal phase.
pub const INITIAL_DOTS: usize = 4;

/// Number of cells the player has to reproduce.
pub const GUESS_DOTS: usize = 3;

pub const SEQUENCE_LEN: usize = INITIAL_DOTS + GUESS_DOTS;

pub const REVEAL_DELAY_MS: u32 = 700;
pub const TICK_MS: u32 = 1000;
pub const HINT_DELAY_SECS: u32 = 7;
pub const WRONG_CELL_DISPLAY_MS: u32 = 1000;
pub const NEXT_LEVEL_DELAY_SECS: u32 = 8;

/// Ordered cells of a level, stored inline for the usual length.
pub type Sequence = SmallVec<[Cell; SEQUENCE_LEN]>;

/// Total number of cells on a board with side `grid_size`.
pub const fn cell_count(grid_size: u8) -> u16 {
    let side = grid_size as u16;
    side.saturating_mul(side)
}

/// Splits a cell position into `(row, col)`.
pub const fn cell_to_coords(cell: Cell, grid_size: u8) -> (u8, u8) {
    (cell / grid_size, cell % grid_size)
}

pub const fn coords_to_cell((row, col): (u8, u8), grid_size: u8) -> Cell {
    row * grid_size + col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_follow_row_major_order() {
        assert_eq!(cell_to_coords(0, GRID_SIZE), (0, 0));
        assert_eq!(cell_to_coords(8, GRID_SIZE), (1, 1));
        assert_eq!(cell_to_coords(48, GRID_SIZE), (6, 6));
        assert_eq!(coords_to_cell((3, 2), GRID_SIZE), 23);
    }

    #[test]
    fn board_has_forty_nine_cells() {
        assert_eq!(cell_count(GRID_SIZE), 49);
    }
}
