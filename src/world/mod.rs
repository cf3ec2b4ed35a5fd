pub mod chunk;
pub mod pos;
pub mod store;

pub use chunk::{Block, Chunk, ChunkData, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};
pub use pos::{
    BlockPos, ChunkPos, LocalBlockPos, TilePos, DIR_BOTTOM, DIR_EAST, DIR_NORTH, DIR_SOUTH,
    DIR_TOP, DIR_WEST,
};
pub use store::{biome_ids, block_ids, TerrainConfig, World};
