pub mod rendering;
/// Isometric tile renderer for block worlds.
/// Projects a chunked voxel world onto square map tiles and composites
/// the visible blocks back-to-front with alpha blending.
pub mod world;

pub use rendering::{
    Biome, BlockImages, BlockRowIterator, Image, RenderFlags, TileRenderer, TopBlockIterator,
    BIOMES, DEFAULT_BIOME,
};
pub use world::{
    Block, BlockPos, Chunk, ChunkPos, LocalBlockPos, TerrainConfig, TilePos, World, CHUNK_HEIGHT,
    CHUNK_WIDTH,
};
