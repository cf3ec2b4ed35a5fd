//! The tile renderer: walks the blocks projecting into one tile in
//! painter's order, enriches their data with neighbor context and
//! composites the sprites into the output image.
//!
//! Rendering treats the world as sparse and lossy. Missing chunks,
//! out-of-range biome ids and sub-ground coordinates all render as air /
//! default biome; a fully missing region yields a fully transparent tile.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::trace;

use crate::rendering::biome::{Biome, BIOMES, DEFAULT_BIOME};
use crate::rendering::flags::{chest_pair_flag, RenderFlags};
use crate::rendering::image::Image;
use crate::rendering::projection::{BlockRowIterator, TopBlockIterator};
use crate::rendering::textures::BlockImages;
use crate::world::chunk::Block;
use crate::world::{
    BlockPos, Chunk, ChunkPos, LocalBlockPos, TilePos, World, DIR_BOTTOM, DIR_EAST, DIR_NORTH,
    DIR_SOUTH, DIR_TOP, DIR_WEST,
};

/// Blocks whose sprite is tinted by the blended biome color.
const BIOME_TINTED_IDS: [u16; 5] = [2, 18, 31, 106, 111];

const WATER_IDS: [u16; 2] = [8, 9];
const LEAVES_ID: u16 = 18;

#[inline]
fn is_water_id(id: u16) -> bool {
    WATER_IDS.contains(&id)
}

#[inline]
fn is_full_water(block: Block) -> bool {
    is_water_id(block.id) && block.data == 0
}

/// A block scheduled for compositing: its sprite and pixel position.
struct RenderBlock {
    pos: BlockPos,
    x: i32,
    y: i32,
    id: u16,
    data: u16,
    image: Image,
}

// Ordered purely by position: two scheduled blocks never share one, and
// the position order is exactly the compositing order.
impl PartialEq for RenderBlock {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for RenderBlock {}

impl PartialOrd for RenderBlock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RenderBlock {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

/// Renders world tiles. Holds no mutable state across tiles, so one
/// instance can be shared by workers rendering disjoint tiles, each into
/// its own output image.
pub struct TileRenderer<'a> {
    world: &'a World,
    images: &'a BlockImages,
    render_biomes: bool,
}

impl<'a> TileRenderer<'a> {
    pub fn new(world: &'a World, images: &'a BlockImages, render_biomes: bool) -> Self {
        Self {
            world,
            images,
            render_biomes,
        }
    }

    /// Block lookup with a chunk hint. The hint is used when the position
    /// falls into it, otherwise the world store is queried; the hint is
    /// never updated here. Below-world positions and missing chunks read
    /// as air.
    pub fn block_at(&self, pos: BlockPos, hint: Option<&Chunk>) -> Block {
        if pos.y < 0 || pos.y >= crate::world::CHUNK_HEIGHT as i32 {
            return Block::AIR;
        }

        let chunk_pos = ChunkPos::containing(pos);
        let chunk = match hint {
            Some(chunk) if chunk.pos() == chunk_pos => Some(chunk),
            _ => self.world.get_chunk(chunk_pos),
        };
        match chunk {
            None => Block::AIR,
            Some(chunk) => {
                let local = LocalBlockPos::of(pos);
                let id = chunk.block_id(local);
                // air carries no data
                if id == 0 {
                    Block::AIR
                } else {
                    Block::new(id, chunk.block_data(local))
                }
            }
        }
    }

    /// Biome at a position, averaged over the 3x3 horizontal neighborhood
    /// to smooth biome borders. Neighbors in unloaded chunks or with
    /// out-of-range ids are skipped; an out-of-range center id (or biome
    /// rendering being off) yields the unblended default biome.
    pub fn block_biome(&self, pos: BlockPos, chunk: &Chunk) -> Biome {
        let biome_id = chunk.biome_at(LocalBlockPos::of(pos)) as usize;
        if !self.render_biomes || biome_id >= BIOMES.len() {
            return BIOMES[DEFAULT_BIOME];
        }

        let mut biome = BIOMES[biome_id];
        let mut count = 1u32;
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let other = pos + BlockPos::new(dx, 0, dz);
                let other_chunk = ChunkPos::containing(other);
                let other_id = if other_chunk == chunk.pos() {
                    chunk.biome_at(LocalBlockPos::of(other))
                } else {
                    match self.world.get_chunk(other_chunk) {
                        Some(chunk) => chunk.biome_at(LocalBlockPos::of(other)),
                        None => continue,
                    }
                };
                if (other_id as usize) < BIOMES.len() {
                    biome += BIOMES[other_id as usize];
                    count += 1;
                }
            }
        }
        biome /= count;
        biome
    }

    /// Enrich a block's data with neighbor context: connectivity bits for
    /// water and the fence family, facing and pairing for chests, facing,
    /// hinge and half for doors, and shadow edge flags for opaque blocks.
    pub fn check_neighbors(&self, pos: BlockPos, chunk: Option<&Chunk>, id: u16, data: u16) -> u16 {
        let mut data = data;

        if is_water_id(id) && data == 0 {
            // only the camera-facing sides matter; the opposite sides are
            // covered by the opaque-water variants of the collapse pass
            let west = self.block_at(pos + DIR_WEST, chunk);
            let south = self.block_at(pos + DIR_SOUTH, chunk);
            if is_full_water(west) {
                data |= RenderFlags::WEST.bits();
            }
            if is_full_water(south) {
                data |= RenderFlags::SOUTH.bits();
            }
        } else if id == 54 || id == 95 || id == 130 || id == 146 {
            // chests: rewrite the facing code into a side bit
            data = match data {
                2 => RenderFlags::NORTH,
                3 => RenderFlags::SOUTH,
                4 => RenderFlags::WEST,
                _ => RenderFlags::EAST,
            }
            .bits();

            if id == 54 {
                for (dir, side) in [
                    (DIR_NORTH, RenderFlags::NORTH),
                    (DIR_SOUTH, RenderFlags::SOUTH),
                    (DIR_EAST, RenderFlags::EAST),
                    (DIR_WEST, RenderFlags::WEST),
                ] {
                    if self.block_at(pos + dir, chunk).id == 54 {
                        data |= chest_pair_flag(side);
                    }
                }
            }
        } else if id == 64 || id == 71 {
            // doors are two stacked half-blocks; hinge and facing are
            // split between the halves, so fetch the missing one
            let is_top = data & 8 != 0;
            let (top_data, bottom_data) = if is_top {
                (data, self.block_at(pos + DIR_BOTTOM, chunk).data)
            } else {
                (self.block_at(pos + DIR_TOP, chunk).data, data)
            };
            if is_top {
                data |= RenderFlags::DOOR_TOP.bits();
            }

            let flipped = top_data & 1 != 0;
            if flipped {
                data |= RenderFlags::DOOR_FLIP_X.bits();
            }
            let opened = bottom_data & 4 == 0;

            let direction = match bottom_data & 3 {
                0 => RenderFlags::WEST,
                1 => RenderFlags::NORTH,
                2 => RenderFlags::EAST,
                _ => RenderFlags::SOUTH,
            };
            // a closed door lies along the wall, so its face turns 90
            // degrees; the hinge side decides which way
            let direction = if opened {
                direction
            } else {
                door_direction_closed(direction, flipped)
            };
            data |= direction.bits();
        } else if id == 85 || id == 101 || id == 102 || id == 113 {
            // fences, iron bars, glass panes and nether fences connect to
            // blocks of their own kind and to opaque blocks
            for (dir, side) in [
                (DIR_NORTH, RenderFlags::NORTH),
                (DIR_SOUTH, RenderFlags::SOUTH),
                (DIR_EAST, RenderFlags::EAST),
                (DIR_WEST, RenderFlags::WEST),
            ] {
                let neighbor = self.block_at(pos + dir, chunk);
                if neighbor.id != 0
                    && (neighbor.id == id
                        || !self.images.is_block_transparent(neighbor.id, neighbor.data))
                {
                    data |= side.bits();
                }
                // fences also connect to fence gates
                if id == 85 && neighbor.id == 107 {
                    data |= side.bits();
                }
            }
        }

        if !self.images.is_block_transparent(id, data) {
            // shadow edges where an opaque block borders air/transparent
            let north = self.block_at(pos + DIR_NORTH, chunk);
            let east = self.block_at(pos + DIR_EAST, chunk);
            let bottom = self.block_at(pos + DIR_BOTTOM, chunk);

            if north.id == 0 || self.images.is_block_transparent(north.id, north.data) {
                data |= RenderFlags::EDGE_NORTH.bits();
            }
            if east.id == 0 || self.images.is_block_transparent(east.id, east.data) {
                data |= RenderFlags::EDGE_EAST.bits();
            }
            if bottom.id == 0 || self.images.is_block_transparent(bottom.id, bottom.data) {
                data |= RenderFlags::EDGE_BOTTOM.bits();
            }
        }

        data
    }

    /// Render one tile into `out` (resized to tile_size x tile_size).
    pub fn render_tile(&self, tile: TilePos, out: &mut Image) {
        let block_size = self.images.block_image_size();
        let tile_size = self.images.tile_size();
        out.set_size(tile_size, tile_size);

        // water layers stacked on screen until they read as opaque
        let max_water = self.images.max_water_needed_opaque();

        // all visible blocks of this tile, in compositing order
        let mut blocks: BTreeSet<RenderBlock> = BTreeSet::new();

        // most recently used chunk, passed into every lookup as a hint
        let mut chunk: Option<&Chunk> = None;

        let mut it = TopBlockIterator::new(tile, block_size);
        while !it.end() {
            let mut water = 0;
            // blocks of the current screen cell, front one last
            let mut row_nodes: BTreeSet<RenderBlock> = BTreeSet::new();

            let mut row = BlockRowIterator::new(it.current());
            while !row.end() {
                let pos = row.current();
                let current_chunk = ChunkPos::containing(pos);
                if chunk.map_or(true, |c| c.pos() != current_chunk) {
                    chunk = self.world.get_chunk(current_chunk);
                }
                let Some(current) = chunk else {
                    row.next();
                    continue;
                };

                let local = LocalBlockPos::of(pos);
                let id = current.block_id(local);
                if id == 0 {
                    row.next();
                    continue;
                }
                let raw_data = current.block_data(local);

                if is_full_water(Block::new(id, raw_data)) {
                    water += 1;
                    // enough water stacked: drop the hidden layers and
                    // stop searching deeper
                    if water > max_water {
                        self.collapse_water(&mut row_nodes, chunk);
                        break;
                    }
                } else {
                    water = 0;
                }

                let data = self.check_neighbors(pos, chunk, id, raw_data);
                let transparent = self.images.is_block_transparent(id, data);
                let image = if BIOME_TINTED_IDS.contains(&id) {
                    self.images
                        .get_biome_depend_block(id, data, self.block_biome(pos, current))
                } else {
                    self.images.get_block(id, data)
                };

                row_nodes.insert(RenderBlock {
                    pos,
                    x: it.draw_x(),
                    y: it.draw_y(),
                    id,
                    data,
                    image,
                });

                // nothing behind an opaque block is visible
                if !transparent {
                    break;
                }
                row.next();
            }

            // merge the cell into the tile set, skipping a leaf block
            // when the one in front of it is the same leaf variant
            let mut nodes = row_nodes.into_iter().peekable();
            while let Some(node) = nodes.next() {
                if let Some(next) = nodes.peek() {
                    if node.id == LEAVES_ID
                        && next.id == LEAVES_ID
                        && (node.data & 3) == (next.data & 3)
                    {
                        continue;
                    }
                }
                blocks.insert(node);
            }

            it.next();
        }

        for node in &blocks {
            out.alpha_blit(&node.image, node.x, node.y);
        }
        trace!(tx = tile.x, ty = tile.y, blocks = blocks.len(), "composited tile");
    }

    /// Replace a stack of water layers with the single opaque-water
    /// sprite: the hidden deeper layers are dropped and the topmost one
    /// swaps its image for the variant matching its south/west neighbors.
    fn collapse_water(&self, row_nodes: &mut BTreeSet<RenderBlock>, chunk: Option<&Chunk>) {
        while let Some(node) = row_nodes.pop_first() {
            let next_is_water = row_nodes.first().is_some_and(|next| is_water_id(next.id));
            if next_is_water {
                // a deeper, fully hidden water layer
                continue;
            }

            let south = self.block_at(node.pos + DIR_SOUTH, chunk);
            let west = self.block_at(node.pos + DIR_WEST, chunk);
            let image = self
                .images
                .get_opaque_water(is_water_id(south.id), is_water_id(west.id));
            row_nodes.insert(RenderBlock { image, ..node });
            break;
        }
    }
}

/// Face direction of a closed door: rotated a quarter turn from the
/// stored facing, clockwise normally, counter-clockwise when the hinge
/// is flipped.
fn door_direction_closed(direction: RenderFlags, flipped: bool) -> RenderFlags {
    if !flipped {
        if direction == RenderFlags::NORTH {
            RenderFlags::EAST
        } else if direction == RenderFlags::SOUTH {
            RenderFlags::WEST
        } else if direction == RenderFlags::EAST {
            RenderFlags::SOUTH
        } else if direction == RenderFlags::WEST {
            RenderFlags::NORTH
        } else {
            RenderFlags::empty()
        }
    } else if direction == RenderFlags::NORTH {
        RenderFlags::WEST
    } else if direction == RenderFlags::SOUTH {
        RenderFlags::EAST
    } else if direction == RenderFlags::EAST {
        RenderFlags::NORTH
    } else if direction == RenderFlags::WEST {
        RenderFlags::SOUTH
    } else {
        RenderFlags::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_door_rotation_table() {
        use RenderFlags as F;
        let unflipped = [
            (F::NORTH, F::EAST),
            (F::SOUTH, F::WEST),
            (F::EAST, F::SOUTH),
            (F::WEST, F::NORTH),
        ];
        for (from, to) in unflipped {
            assert_eq!(door_direction_closed(from, false), to);
        }
        let flipped = [
            (F::NORTH, F::WEST),
            (F::SOUTH, F::EAST),
            (F::EAST, F::NORTH),
            (F::WEST, F::SOUTH),
        ];
        for (from, to) in flipped {
            assert_eq!(door_direction_closed(from, true), to);
        }
    }

    #[test]
    fn render_blocks_order_by_position_only() {
        let images = BlockImages::new(16);
        let make = |pos| RenderBlock {
            pos,
            x: 0,
            y: 0,
            id: 1,
            data: 0,
            image: images.get_block(1, 0),
        };

        let mut set = BTreeSet::new();
        set.insert(make(BlockPos::new(0, 64, 0)));
        set.insert(make(BlockPos::new(1, 63, -1))); // deeper on the same cell
        set.insert(make(BlockPos::new(0, 65, 0))); // one above

        let order: Vec<BlockPos> = set.into_iter().map(|n| n.pos).collect();
        assert_eq!(
            order,
            vec![
                BlockPos::new(1, 63, -1),
                BlockPos::new(0, 64, 0),
                BlockPos::new(0, 65, 0),
            ]
        );
    }
}
