pub mod biome;
/// Sprite-compositing render pipeline: tile projection, the two block
/// iterators, the block image catalog and the tile renderer itself.
pub mod flags;
pub mod image;
pub mod projection;
pub mod textures;
pub mod tile;

pub use biome::{Biome, BIOMES, DEFAULT_BIOME};
pub use flags::{chest_pair_flag, RenderFlags};
pub use image::Image;
pub use projection::{BlockRowIterator, TopBlockIterator};
pub use textures::BlockImages;
pub use tile::TileRenderer;
