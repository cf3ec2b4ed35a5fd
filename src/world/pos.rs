//! Position types for blocks, chunks and map tiles.
//!
//! The isometric screen axes are derived from block coordinates:
//! `row = z - x + 2 * (256 - y)` and `col = x + z`. One `z` step moves a
//! block one row down and one column right, one `x` step moves it one row
//! up and one column right, and one `y` step down moves it two rows down.
//! The depth step `(x+1, y-1, z-1)` leaves both axes unchanged, which is
//! what lines up the blocks hidden behind each other on a tile.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::world::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// A block position in world space. `y` is the vertical axis (0..=255).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

pub const DIR_NORTH: BlockPos = BlockPos::new(0, 0, -1);
pub const DIR_SOUTH: BlockPos = BlockPos::new(0, 0, 1);
pub const DIR_EAST: BlockPos = BlockPos::new(1, 0, 0);
pub const DIR_WEST: BlockPos = BlockPos::new(-1, 0, 0);
pub const DIR_TOP: BlockPos = BlockPos::new(0, 1, 0);
pub const DIR_BOTTOM: BlockPos = BlockPos::new(0, -1, 0);

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Isometric screen row of this block.
    #[inline]
    pub const fn row(&self) -> i32 {
        self.z - self.x + 2 * (CHUNK_HEIGHT as i32 - self.y)
    }

    /// Isometric screen column of this block.
    #[inline]
    pub const fn col(&self) -> i32 {
        self.x + self.z
    }
}

impl Add for BlockPos {
    type Output = BlockPos;

    fn add(self, rhs: Self) -> Self::Output {
        BlockPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for BlockPos {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;

    fn sub(self, rhs: Self) -> Self::Output {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for BlockPos {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

/// Painter's-algorithm compositing order.
///
/// Blocks that sort earlier are drawn first and may be overdrawn. The
/// camera sees the west (-x), south (+z) and top (+y) faces, so "farther
/// away" means lower, more-east, more-north. Ascending `y`, descending
/// `x`, ascending `z` puts the farthest block first.
impl Ord for BlockPos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .cmp(&other.y)
            .then_with(|| other.x.cmp(&self.x))
            .then_with(|| self.z.cmp(&other.z))
    }
}

impl PartialOrd for BlockPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn div_floor(value: i32, divisor: i32) -> i32 {
    let mut q = value / divisor;
    if value % divisor < 0 {
        q -= 1;
    }
    q
}

fn mod_floor(value: i32, divisor: i32) -> i32 {
    let mut r = value % divisor;
    if r < 0 {
        r += divisor;
    }
    r
}

/// A chunk column position. Chunks are 16x16 columns, 256 blocks tall.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing a block position.
    #[inline]
    pub fn containing(block: BlockPos) -> Self {
        Self {
            x: div_floor(block.x, CHUNK_WIDTH as i32),
            z: div_floor(block.z, CHUNK_WIDTH as i32),
        }
    }

    /// Inverse of `row`/`col`. `row + col` must be even; the renderer only
    /// calls this with tile-aligned values, which always are.
    #[inline]
    pub const fn from_row_col(row: i32, col: i32) -> Self {
        Self {
            x: (col - row) / 2,
            z: (col + row) / 2,
        }
    }

    #[inline]
    pub const fn row(&self) -> i32 {
        self.z - self.x
    }

    #[inline]
    pub const fn col(&self) -> i32 {
        self.x + self.z
    }
}

/// A block position relative to its chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalBlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalBlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Local coordinates of a global block position (negative-safe).
    #[inline]
    pub fn of(block: BlockPos) -> Self {
        Self {
            x: mod_floor(block.x, CHUNK_WIDTH as i32),
            y: block.y,
            z: mod_floor(block.z, CHUNK_WIDTH as i32),
        }
    }

    /// Global position of this local position inside `chunk`.
    #[inline]
    pub fn to_global(self, chunk: ChunkPos) -> BlockPos {
        BlockPos::new(
            chunk.x * CHUNK_WIDTH as i32 + self.x,
            self.y,
            chunk.z * CHUNK_WIDTH as i32 + self.z,
        )
    }
}

/// An index of a square map tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_axis_steps() {
        let p = BlockPos::new(10, 64, -3);

        // z+1 moves one row down, one column right
        let south = p + DIR_SOUTH;
        assert_eq!(south.row(), p.row() + 1);
        assert_eq!(south.col(), p.col() + 1);

        // x+1 moves one row up, one column right
        let east = p + DIR_EAST;
        assert_eq!(east.row(), p.row() - 1);
        assert_eq!(east.col(), p.col() + 1);

        // one block down moves two rows down
        let below = p + DIR_BOTTOM;
        assert_eq!(below.row(), p.row() + 2);
        assert_eq!(below.col(), p.col());

        // the depth step keeps the screen cell
        let behind = p + BlockPos::new(1, -1, -1);
        assert_eq!(behind.row(), p.row());
        assert_eq!(behind.col(), p.col());
    }

    #[test]
    fn painter_order_draws_far_blocks_first() {
        let near = BlockPos::new(0, 64, 0);

        // Lower blocks draw before higher ones.
        assert!(BlockPos::new(0, 63, 0) < near);
        // Behind (deeper along the view diagonal) draws before.
        assert!(BlockPos::new(1, 63, -1) < near);
        // More east (+x) is farther, draws before.
        assert!(BlockPos::new(1, 64, 0) < near);
        // More south (+z) is nearer, draws after.
        assert!(BlockPos::new(0, 64, 1) > near);
    }

    #[test]
    fn chunk_containing_handles_negative_coordinates() {
        assert_eq!(
            ChunkPos::containing(BlockPos::new(0, 0, 0)),
            ChunkPos::new(0, 0)
        );
        assert_eq!(
            ChunkPos::containing(BlockPos::new(-1, 0, -1)),
            ChunkPos::new(-1, -1)
        );
        assert_eq!(
            ChunkPos::containing(BlockPos::new(16, 0, -17)),
            ChunkPos::new(1, -2)
        );
    }

    #[test]
    fn from_row_col_inverts_row_col() {
        for x in -5..5 {
            for z in -5..5 {
                let chunk = ChunkPos::new(x, z);
                assert_eq!(ChunkPos::from_row_col(chunk.row(), chunk.col()), chunk);
            }
        }
    }

    #[test]
    fn local_round_trips_through_global() {
        let chunk = ChunkPos::new(-3, 7);
        for &(x, y, z) in &[(0, 0, 0), (15, 255, 15), (8, 64, 6)] {
            let local = LocalBlockPos::new(x, y, z);
            let global = local.to_global(chunk);
            assert_eq!(LocalBlockPos::of(global), local);
            assert_eq!(ChunkPos::containing(global), chunk);
        }
    }

    #[test]
    fn chunk_row_col_is_consistent_with_block_row_col() {
        // At fixed height, a chunk's 16x16 columns span a 16-row by
        // 31-column block parallelogram anchored at 16 * the chunk axes.
        let chunk = ChunkPos::new(4, -2);
        let base = LocalBlockPos::new(0, 255, 0).to_global(chunk);
        assert_eq!(base.col(), 16 * chunk.col());
        assert_eq!(base.row(), 16 * chunk.row() + 2);
    }
}
