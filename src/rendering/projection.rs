//! Tile projection geometry: the iterator over the top blocks of a tile
//! and the iterator over the blocks stacked behind each of them.
//!
//! Both are explicit cursors with `next`/`end`; after `end()` turns true
//! the current position must not be read. `next` is called exactly once
//! per step.

use crate::world::{BlockPos, ChunkPos, LocalBlockPos, TilePos, DIR_SOUTH};

/// Walks the highest candidate-visible block of every screen cell of a
/// tile, together with the pixel position the cell is drawn at.
///
/// The walk follows down-right diagonals (`z+1` keeps the anchor height,
/// moving one row down and one column right on screen). When a diagonal
/// leaves the tile, the anchor moves one block west to start the next
/// diagonal, fast-forwarding past the tile's left edge.
pub struct TopBlockIterator {
    block_size: i32,
    is_end: bool,
    min_row: i32,
    max_row: i32,
    min_col: i32,
    max_col: i32,
    top: BlockPos,
    current: BlockPos,
    draw_x: i32,
    draw_y: i32,
}

impl TopBlockIterator {
    pub fn new(tile: TilePos, block_size: i32) -> Self {
        // the chunk whose row/col sits at the top right of the tile
        let topright_chunk = ChunkPos::from_row_col(4 * tile.y, 2 * tile.x + 2);
        // first visible block of this chunk in this tile
        let top = LocalBlockPos::new(8, 255, 6).to_global(topright_chunk);

        let min_row = top.row() + 1;
        let max_row = top.row() + 64 + 4;
        let max_col = top.col() + 2;
        let min_col = max_col - 32;

        let mut it = Self {
            block_size,
            is_end: false,
            min_row,
            max_row,
            min_col,
            max_col,
            top,
            current: top,
            draw_x: 0,
            draw_y: 0,
        };
        it.update_draw_position();
        it
    }

    /// Advance to the next screen cell.
    pub fn next(&mut self) {
        if self.is_end {
            return;
        }

        // one block to the bottom right
        self.current += DIR_SOUTH;

        if self.current.col() > self.max_col || self.current.row() > self.max_row {
            // move the anchor one block to the left and restart there
            self.top -= BlockPos::new(1, 0, 1);
            self.current = self.top;

            // skip the part of the diagonal left of the tile
            if self.current.col() < self.min_col - 1 {
                let advance = self.min_col - self.current.col() - 1;
                self.current += BlockPos::new(0, 0, advance);
            }
        }

        self.update_draw_position();

        let row = self.current.row();
        let col = self.current.col();
        if row == self.max_row && (col == self.min_col || col == self.min_col + 1) {
            self.is_end = true;
        }
    }

    #[inline]
    pub fn end(&self) -> bool {
        self.is_end
    }

    #[inline]
    pub fn current(&self) -> BlockPos {
        self.current
    }

    /// Pixel x of the current cell within the tile.
    #[inline]
    pub fn draw_x(&self) -> i32 {
        self.draw_x
    }

    /// Pixel y of the current cell within the tile. Shifted half a block
    /// up because the cube's top face is drawn above its row line.
    #[inline]
    pub fn draw_y(&self) -> i32 {
        self.draw_y
    }

    #[inline]
    pub fn min_row(&self) -> i32 {
        self.min_row
    }

    #[inline]
    pub fn max_row(&self) -> i32 {
        self.max_row
    }

    #[inline]
    pub fn min_col(&self) -> i32 {
        self.min_col
    }

    #[inline]
    pub fn max_col(&self) -> i32 {
        self.max_col
    }

    fn update_draw_position(&mut self) {
        // every column is half a block wide, every row a quarter block tall
        self.draw_x = (self.current.col() - self.min_col) * (self.block_size / 2);
        self.draw_y =
            (self.current.row() - self.min_row) * (self.block_size / 4) - self.block_size / 2;
    }
}

/// Walks the blocks that project onto the same screen cell as `top`,
/// front to back: each step is one block east, one down, one north.
pub struct BlockRowIterator {
    current: BlockPos,
}

impl BlockRowIterator {
    pub fn new(top: BlockPos) -> Self {
        Self { current: top }
    }

    pub fn next(&mut self) {
        self.current.x += 1;
        self.current.y -= 1;
        self.current.z -= 1;
    }

    #[inline]
    pub fn end(&self) -> bool {
        self.current.y < 0
    }

    #[inline]
    pub fn current(&self) -> BlockPos {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const BLOCK_SIZE: i32 = 16;

    fn collect_cells(tile: TilePos) -> (TopBlockIterator, Vec<(BlockPos, i32, i32)>) {
        let mut it = TopBlockIterator::new(tile, BLOCK_SIZE);
        let mut cells = Vec::new();
        let mut steps = 0;
        while !it.end() {
            cells.push((it.current(), it.draw_x(), it.draw_y()));
            it.next();
            steps += 1;
            assert!(steps < 10_000, "top iterator failed to terminate");
        }
        (it, cells)
    }

    #[test]
    fn top_iterator_starts_at_the_tile_anchor_block() {
        let it = TopBlockIterator::new(TilePos::new(0, 0), BLOCK_SIZE);
        let chunk = ChunkPos::from_row_col(0, 2);
        let expected = LocalBlockPos::new(8, 255, 6).to_global(chunk);
        assert_eq!(it.current(), expected);
        assert_eq!(it.min_row(), expected.row() + 1);
        assert_eq!(it.max_row(), expected.row() + 68);
        assert_eq!(it.max_col(), expected.col() + 2);
        assert_eq!(it.min_col(), expected.col() - 30);
    }

    #[test]
    fn top_iterator_visits_each_screen_cell_once() {
        for tile in [TilePos::new(0, 0), TilePos::new(-1, 5), TilePos::new(3, -2)] {
            let (_, cells) = collect_cells(tile);
            assert!(cells.len() > 1000, "suspiciously few cells: {}", cells.len());

            let mut seen = HashSet::new();
            for (pos, _, _) in &cells {
                assert!(
                    seen.insert((pos.row(), pos.col())),
                    "cell ({}, {}) visited twice",
                    pos.row(),
                    pos.col()
                );
            }
        }
    }

    #[test]
    fn top_iterator_stays_inside_the_tile_bounds() {
        let (it, cells) = collect_cells(TilePos::new(0, 0));
        for (pos, draw_x, draw_y) in cells {
            // anchors sit one row above min_row, the left fence one
            // column left of min_col
            assert!(pos.row() >= it.min_row() - 1 && pos.row() <= it.max_row());
            assert!(pos.col() >= it.min_col() - 1 && pos.col() <= it.max_col());
            assert!(pos.y == 255, "top blocks walk the highest layer");

            assert!(draw_x >= -BLOCK_SIZE / 2 && draw_x <= BLOCK_SIZE * 16);
            assert!(draw_y >= -BLOCK_SIZE && draw_y <= BLOCK_SIZE * 16 + BLOCK_SIZE / 4);
        }
    }

    #[test]
    fn top_iterator_cells_all_have_even_parity() {
        // block columns project onto cells with even row+col only; the
        // walk must never produce a cell between columns
        let (_, cells) = collect_cells(TilePos::new(0, 0));
        for (pos, _, _) in cells {
            assert_eq!((pos.row() + pos.col()).rem_euclid(2), 0);
        }
    }

    #[test]
    fn adjacent_tiles_share_their_border_column() {
        let a = TopBlockIterator::new(TilePos::new(0, 0), BLOCK_SIZE);
        let b = TopBlockIterator::new(TilePos::new(1, 0), BLOCK_SIZE);
        assert_eq!(a.max_col(), b.min_col());
        assert_eq!(a.min_row(), b.min_row());
    }

    #[test]
    fn row_iterator_descends_to_bedrock_in_256_steps() {
        let top = BlockPos::new(40, 255, -12);
        let mut it = BlockRowIterator::new(top);
        let mut steps = 0;
        while !it.end() {
            let p = it.current();
            // every step projects onto the same screen cell
            assert_eq!(p.row(), top.row());
            assert_eq!(p.col(), top.col());
            it.next();
            steps += 1;
            assert!(steps <= 256);
        }
        assert_eq!(steps, 256);
    }
}
