//! World storage and demo terrain generation.
//!
//! The renderer only ever consumes `get_chunk`; the mutating helpers
//! exist so tests and the demo binary can build worlds block by block.

use std::collections::HashMap;

use glam::IVec2;
use noise::{NoiseFn, Perlin};
use tracing::debug;

use crate::world::chunk::{Block, Chunk, CHUNK_WIDTH};
use crate::world::pos::{BlockPos, ChunkPos, LocalBlockPos};

pub mod block_ids {
    pub const AIR: u16 = 0;
    pub const STONE: u16 = 1;
    pub const GRASS: u16 = 2;
    pub const DIRT: u16 = 3;
    pub const WATER: u16 = 9;
    pub const SAND: u16 = 12;
    pub const LOG: u16 = 17;
    pub const LEAVES: u16 = 18;
}

pub mod biome_ids {
    pub const PLAINS: u8 = 1;
    pub const DESERT: u8 = 2;
    pub const FOREST: u8 = 4;
}

/// Terrain generation parameters.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    pub seed: u32,
    /// Water fills every column up to this height.
    pub sea_level: i32,
    pub base_height: i32,
    pub height_amplitude: f64,
    pub height_scale: f64,
    /// Horizontal scale of the biome field.
    pub biome_scale: f64,
    /// Chance per surface column to plant a tree (forest biome only).
    pub tree_chance: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            sea_level: 62,
            base_height: 64,
            height_amplitude: 14.0,
            height_scale: 0.012,
            biome_scale: 0.004,
            tree_chance: 0.008,
        }
    }
}

/// A map of loaded chunks. Read-only from the renderer's point of view.
#[derive(Default)]
pub struct World {
    chunks: HashMap<ChunkPos, Chunk>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk lookup; `None` means the chunk is not loaded and renders as air.
    #[inline]
    pub fn get_chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.pos(), chunk);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Set one block, creating an all-air chunk on demand.
    pub fn set_block(&mut self, pos: BlockPos, id: u16, data: u16) {
        let chunk_pos = ChunkPos::containing(pos);
        let chunk = self
            .chunks
            .entry(chunk_pos)
            .or_insert_with(|| Chunk::uniform(chunk_pos, Block::AIR));
        chunk.set_block(LocalBlockPos::of(pos), Block::new(id, data));
    }

    /// Set the biome of one column, creating an all-air chunk on demand.
    pub fn set_biome(&mut self, x: i32, z: i32, biome: u8) {
        let pos = BlockPos::new(x, 0, z);
        let chunk_pos = ChunkPos::containing(pos);
        let local = LocalBlockPos::of(pos);
        let chunk = self
            .chunks
            .entry(chunk_pos)
            .or_insert_with(|| Chunk::uniform(chunk_pos, Block::AIR));
        chunk.set_biome(local.x, local.z, biome);
    }

    /// Fill the chunk rectangle `[min, max]` with noise terrain.
    pub fn generate_region(&mut self, min: IVec2, max: IVec2, config: &TerrainConfig) {
        let before = self.chunks.len();
        for cx in min.x..=max.x {
            for cz in min.y..=max.y {
                let pos = ChunkPos::new(cx, cz);
                if !self.chunks.contains_key(&pos) {
                    let chunk = generate_chunk(pos, config);
                    self.chunks.insert(pos, chunk);
                }
            }
        }
        debug!(
            chunks = self.chunks.len() - before,
            "generated terrain region"
        );
    }
}

fn generate_chunk(pos: ChunkPos, config: &TerrainConfig) -> Chunk {
    let perlin = Perlin::new(config.seed);
    let biome_noise = Perlin::new(config.seed.wrapping_add(1));
    let tree_noise = Perlin::new(config.seed.wrapping_add(2));

    let mut chunk = Chunk::uniform(pos, Block::AIR);
    let base = IVec2::new(pos.x * CHUNK_WIDTH as i32, pos.z * CHUNK_WIDTH as i32);

    for lz in 0..CHUNK_WIDTH as i32 {
        for lx in 0..CHUNK_WIDTH as i32 {
            let world = base + IVec2::new(lx, lz);
            let height = surface_height(&perlin, world, config);
            let biome = column_biome(&biome_noise, world, config);
            chunk.set_biome(lx, lz, biome);

            let beach = height <= config.sea_level + 1;
            for y in 0..=height.min(255) {
                let id = if y == height {
                    if biome == biome_ids::DESERT || beach {
                        block_ids::SAND
                    } else {
                        block_ids::GRASS
                    }
                } else if y > height - 4 {
                    if biome == biome_ids::DESERT || beach {
                        block_ids::SAND
                    } else {
                        block_ids::DIRT
                    }
                } else {
                    block_ids::STONE
                };
                chunk.set_block(LocalBlockPos::new(lx, y, lz), Block::new(id, 0));
            }

            // flood up to sea level
            for y in (height + 1).max(0)..=config.sea_level {
                chunk.set_block(LocalBlockPos::new(lx, y, lz), Block::new(block_ids::WATER, 0));
            }

            // sparse trees, kept away from chunk borders so the canopy
            // never crosses into a neighbouring chunk
            if biome == biome_ids::FOREST
                && height > config.sea_level + 1
                && (2..CHUNK_WIDTH as i32 - 2).contains(&lx)
                && (2..CHUNK_WIDTH as i32 - 2).contains(&lz)
            {
                let roll = tree_noise.get([world.x as f64 * 0.73, world.y as f64 * 0.73]);
                if roll > 1.0 - 2.0 * config.tree_chance {
                    plant_tree(&mut chunk, lx, height + 1, lz);
                }
            }
        }
    }
    chunk
}

fn surface_height(perlin: &Perlin, world: IVec2, config: &TerrainConfig) -> i32 {
    let n = perlin.get([
        world.x as f64 * config.height_scale,
        world.y as f64 * config.height_scale,
    ]);
    (config.base_height as f64 + n * config.height_amplitude) as i32
}

fn column_biome(biome_noise: &Perlin, world: IVec2, config: &TerrainConfig) -> u8 {
    let n = biome_noise.get([
        world.x as f64 * config.biome_scale,
        world.y as f64 * config.biome_scale,
    ]);
    if n < -0.35 {
        biome_ids::DESERT
    } else if n > 0.15 {
        biome_ids::FOREST
    } else {
        biome_ids::PLAINS
    }
}

fn plant_tree(chunk: &mut Chunk, x: i32, base: i32, z: i32) {
    let trunk_top = (base + 4).min(253);
    for y in base..trunk_top {
        chunk.set_block(LocalBlockPos::new(x, y, z), Block::new(block_ids::LOG, 0));
    }
    for dy in -2..=1 {
        let y = trunk_top + dy;
        let radius = if dy >= 0 { 1 } else { 2 };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && dy < 0 {
                    continue; // trunk
                }
                let local = LocalBlockPos::new(x + dx, y, z + dz);
                if chunk.block_id(local) == block_ids::AIR {
                    chunk.set_block(local, Block::new(block_ids::LEAVES, 0));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_block_creates_chunks_on_demand() {
        let mut world = World::new();
        assert!(world.get_chunk(ChunkPos::new(0, 0)).is_none());

        world.set_block(BlockPos::new(3, 64, -5), block_ids::STONE, 0);

        let chunk = world.get_chunk(ChunkPos::new(0, -1)).expect("chunk created");
        assert_eq!(
            chunk.block_id(LocalBlockPos::of(BlockPos::new(3, 64, -5))),
            block_ids::STONE
        );
    }

    #[test]
    fn generated_terrain_has_a_surface_and_respects_sea_level() {
        let mut world = World::new();
        let config = TerrainConfig::default();
        world.generate_region(IVec2::new(0, 0), IVec2::new(1, 1), &config);
        assert_eq!(world.chunk_count(), 4);

        let chunk = world.get_chunk(ChunkPos::new(0, 0)).unwrap();
        for lz in 0..CHUNK_WIDTH as i32 {
            for lx in 0..CHUNK_WIDTH as i32 {
                // bedrock level is always solid
                assert_ne!(chunk.block_id(LocalBlockPos::new(lx, 0, lz)), block_ids::AIR);
                // at sea level every column is either ground or water
                assert_ne!(
                    chunk.block_id(LocalBlockPos::new(lx, config.sea_level, lz)),
                    block_ids::AIR
                );
            }
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let config = TerrainConfig::default();
        let a = generate_chunk(ChunkPos::new(2, -3), &config);
        let b = generate_chunk(ChunkPos::new(2, -3), &config);
        for y in 0..64 {
            for z in 0..CHUNK_WIDTH as i32 {
                for x in 0..CHUNK_WIDTH as i32 {
                    let local = LocalBlockPos::new(x, y, z);
                    assert_eq!(a.block_id(local), b.block_id(local));
                }
            }
        }
    }
}
