//! Chunk storage.
//!
//! Chunks that consist of a single block (all air, all stone) are stored
//! as one value; everything else stores full id/data arrays. This keeps
//! sky and deep-underground chunks cheap, which matters because a tile
//! walks every depth row down to bedrock.

use crate::world::pos::{ChunkPos, LocalBlockPos};

pub const CHUNK_WIDTH: usize = 16;
pub const CHUNK_HEIGHT: usize = 256;
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_WIDTH;
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_HEIGHT;

/// An id/data pair as stored in the world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub id: u16,
    pub data: u16,
}

impl Block {
    pub const AIR: Self = Self { id: 0, data: 0 };

    #[inline]
    pub const fn new(id: u16, data: u16) -> Self {
        Self { id, data }
    }
}

pub enum ChunkData {
    /// Every block in the chunk is the same value.
    Uniform(Block),
    /// Heterogeneous blocks; boxed to keep `Chunk` small on the stack.
    Varied {
        ids: Box<[u16; CHUNK_VOLUME]>,
        data: Box<[u16; CHUNK_VOLUME]>,
    },
}

pub struct Chunk {
    position: ChunkPos,
    data: ChunkData,
    /// Biome id per column, indexed `z * 16 + x`.
    biomes: [u8; CHUNK_AREA],
}

#[inline]
fn index(local: LocalBlockPos) -> usize {
    debug_assert!(
        local.x >= 0
            && (local.x as usize) < CHUNK_WIDTH
            && local.y >= 0
            && (local.y as usize) < CHUNK_HEIGHT
            && local.z >= 0
            && (local.z as usize) < CHUNK_WIDTH
    );
    (local.y as usize) * CHUNK_AREA + (local.z as usize) * CHUNK_WIDTH + local.x as usize
}

impl Chunk {
    /// Create a chunk with every block set to the same value.
    pub fn uniform(position: ChunkPos, block: Block) -> Self {
        Self {
            position,
            data: ChunkData::Uniform(block),
            biomes: [0; CHUNK_AREA],
        }
    }

    #[inline]
    pub fn pos(&self) -> ChunkPos {
        self.position
    }

    #[inline]
    pub fn block_id(&self, local: LocalBlockPos) -> u16 {
        match &self.data {
            ChunkData::Uniform(block) => block.id,
            ChunkData::Varied { ids, .. } => ids[index(local)],
        }
    }

    #[inline]
    pub fn block_data(&self, local: LocalBlockPos) -> u16 {
        match &self.data {
            ChunkData::Uniform(block) => block.data,
            ChunkData::Varied { data, .. } => data[index(local)],
        }
    }

    #[inline]
    pub fn biome_at(&self, local: LocalBlockPos) -> u8 {
        self.biomes[(local.z as usize) * CHUNK_WIDTH + local.x as usize]
    }

    /// Set a block, promoting uniform storage to full arrays if needed.
    pub fn set_block(&mut self, local: LocalBlockPos, block: Block) {
        if let ChunkData::Uniform(uniform) = self.data {
            self.data = ChunkData::Varied {
                ids: Box::new([uniform.id; CHUNK_VOLUME]),
                data: Box::new([uniform.data; CHUNK_VOLUME]),
            };
        }
        if let ChunkData::Varied { ids, data } = &mut self.data {
            let i = index(local);
            ids[i] = block.id;
            data[i] = block.data;
        }
    }

    pub fn set_biome(&mut self, x: i32, z: i32, biome: u8) {
        self.biomes[(z as usize) * CHUNK_WIDTH + x as usize] = biome;
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        matches!(self.data, ChunkData::Uniform(_))
    }
}
