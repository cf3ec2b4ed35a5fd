//! Procedural block image catalog.
//!
//! Sprites are flat-shaded cubes synthesized from a per-id color table.
//! A block sprite is `block_size` pixels square: the top face fills the
//! upper half as a rhombus, the west and south faces fill the lower-left
//! and lower-right quarters. Synthesis is pure, so the catalog can be
//! shared across render workers without locking.

use crate::rendering::biome::Biome;
use crate::rendering::flags::RenderFlags;
use crate::rendering::image::{rgba_to_u32, Image};

/// Alpha of one water layer; also drives `max_water_needed_opaque`.
const WATER_ALPHA: u8 = 150;

/// Stacked translucent layers read as opaque once they reach this alpha.
const OPAQUE_ALPHA: u32 = 250;

const TOP_SHADE: u32 = 255;
const SOUTH_SHADE: u32 = 204;
const WEST_SHADE: u32 = 153;
const EDGE_SHADE: u32 = 178;

pub struct BlockImages {
    block_size: i32,
    max_water: i32,
}

impl BlockImages {
    /// `block_size` is the pixel height of one projected cube and must be
    /// a multiple of 4 so the half- and quarter-block pixel offsets stay
    /// exact.
    pub fn new(block_size: i32) -> Self {
        assert!(
            block_size > 0 && block_size % 4 == 0,
            "block size must be a positive multiple of 4, got {block_size}"
        );
        Self {
            block_size,
            max_water: water_layers_until_opaque(WATER_ALPHA),
        }
    }

    #[inline]
    pub fn block_image_size(&self) -> i32 {
        self.block_size
    }

    /// A tile spans 16 blocks in both screen axes.
    #[inline]
    pub fn tile_size(&self) -> i32 {
        self.block_size * 16
    }

    /// Number of stacked water layers needed before the stack reads as
    /// opaque; deeper water is collapsed by the renderer.
    #[inline]
    pub fn max_water_needed_opaque(&self) -> i32 {
        self.max_water
    }

    /// Whether a block lets the row walk continue behind it. Covers both
    /// translucent pixels (water, leaves) and partial shapes (fences,
    /// doors, chests).
    pub fn is_block_transparent(&self, id: u16, _data: u16) -> bool {
        matches!(
            id,
            0 | 6
                | 8
                | 9
                | 18
                | 20
                | 26
                | 27
                | 30
                | 31
                | 37
                | 38
                | 39
                | 40
                | 50
                | 54
                | 59
                | 63
                | 64
                | 65
                | 66
                | 69
                | 71
                | 75
                | 76
                | 77
                | 78
                | 83
                | 85
                | 90
                | 95
                | 96
                | 101
                | 102
                | 104
                | 105
                | 106
                | 107
                | 111
                | 113
                | 115
                | 117
                | 130
                | 131
                | 132
                | 146
        )
    }

    /// Sprite for a block with neighbor-enriched data.
    pub fn get_block(&self, id: u16, data: u16) -> Image {
        let flags = RenderFlags::from_bits_truncate(data);
        match id {
            8 | 9 => self.water_sprite(flags, WATER_ALPHA),
            85 | 101 | 102 | 107 | 113 => self.post_sprite(id, flags),
            64 | 71 => self.door_sprite(id, flags),
            31 | 37 | 38 | 39 | 40 | 106 => self.plant_sprite(id),
            111 => self.pad_sprite(),
            _ => {
                let (color, alpha) = base_color(id, data);
                self.cube_sprite(color, alpha, flags & RenderFlags::EDGES)
            }
        }
    }

    /// Sprite for a biome-tinted block: the base sprite multiplied
    /// componentwise by the blended biome color.
    pub fn get_biome_depend_block(&self, id: u16, data: u16, biome: Biome) -> Image {
        let mut sprite = self.get_block(id, data);
        tint(&mut sprite, biome.color());
        sprite
    }

    /// Fully opaque water standing in for a collapsed stack of layers.
    /// A side face toward another water block is drawn unshaded so
    /// adjacent stacks read as one surface.
    pub fn get_opaque_water(&self, neighbor_south: bool, neighbor_west: bool) -> Image {
        let bs = self.block_size;
        let (color, _) = base_color(8, 0);
        let mut img = Image::new(bs, bs);
        for py in 0..bs {
            for px in 0..bs {
                let shade = match face_at(bs, px, py) {
                    Some(Face::Top) => TOP_SHADE,
                    Some(Face::West) => {
                        if neighbor_west {
                            TOP_SHADE
                        } else {
                            WEST_SHADE
                        }
                    }
                    Some(Face::South) => {
                        if neighbor_south {
                            TOP_SHADE
                        } else {
                            SOUTH_SHADE
                        }
                    }
                    None => continue,
                };
                img.set_pixel(px, py, shaded(color, shade, 255));
            }
        }
        img
    }

    fn cube_sprite(&self, color: [u8; 3], alpha: u8, edges: RenderFlags) -> Image {
        let bs = self.block_size;
        let mut img = Image::new(bs, bs);
        for py in 0..bs {
            for px in 0..bs {
                let Some(face) = face_at(bs, px, py) else {
                    continue;
                };
                let mut shade = match face {
                    Face::Top => TOP_SHADE,
                    Face::West => WEST_SHADE,
                    Face::South => SOUTH_SHADE,
                };
                if on_shadow_edge(bs, px, py, face, edges) {
                    shade = shade * EDGE_SHADE / 255;
                }
                img.set_pixel(px, py, shaded(color, shade, alpha));
            }
        }
        img
    }

    fn water_sprite(&self, flags: RenderFlags, alpha: u8) -> Image {
        let bs = self.block_size;
        let (color, _) = base_color(8, 0);
        let mut img = Image::new(bs, bs);
        for py in 0..bs {
            for px in 0..bs {
                let shade = match face_at(bs, px, py) {
                    Some(Face::Top) => TOP_SHADE,
                    // a side toward another water block is not drawn at
                    // all; the neighbor's own layers fill those pixels
                    Some(Face::West) if !flags.contains(RenderFlags::WEST) => WEST_SHADE,
                    Some(Face::South) if !flags.contains(RenderFlags::SOUTH) => SOUTH_SHADE,
                    _ => continue,
                };
                img.set_pixel(px, py, shaded(color, shade, alpha));
            }
        }
        img
    }

    /// Fences, bars and panes: a center post plus an arm toward every
    /// connected side.
    fn post_sprite(&self, id: u16, flags: RenderFlags) -> Image {
        let bs = self.block_size;
        let (color, alpha) = base_color(id, 0);
        let mut img = Image::new(bs, bs);
        let cx = bs / 2;
        let cy = bs / 2;
        let half_w = (bs / 16).max(1);

        for py in bs / 4..bs {
            for px in cx - half_w..cx + half_w {
                img.set_pixel(px, py, shaded(color, WEST_SHADE, alpha));
            }
        }
        let arms = [
            (RenderFlags::NORTH, -1, -1),
            (RenderFlags::EAST, 1, -1),
            (RenderFlags::SOUTH, 1, 1),
            (RenderFlags::WEST, -1, 1),
        ];
        for (side, sx, sy) in arms {
            if !flags.contains(side) {
                continue;
            }
            for t in 0..bs / 2 {
                let px = cx + sx * t;
                let py = cy + sy * (t / 2);
                img.set_pixel(px, py, shaded(color, SOUTH_SHADE, alpha));
                img.set_pixel(px, py + 1, shaded(color, SOUTH_SHADE, alpha));
            }
        }
        img
    }

    /// Doors: a thin panel on the face picked by the direction bits. The
    /// back faces (north, east) sit half a block higher on screen.
    fn door_sprite(&self, id: u16, flags: RenderFlags) -> Image {
        let bs = self.block_size;
        let (color, alpha) = base_color(id, 0);
        let mut img = Image::new(bs, bs);

        let (west_side, lift) = if flags.contains(RenderFlags::NORTH) {
            (true, bs / 4)
        } else if flags.contains(RenderFlags::EAST) {
            (false, bs / 4)
        } else if flags.contains(RenderFlags::WEST) {
            (true, 0)
        } else {
            (false, 0)
        };

        for py in 0..bs {
            for px in 0..bs {
                let face = face_at(bs, px, py);
                let wanted = if west_side { Face::West } else { Face::South };
                if face == Some(wanted) {
                    let mut px_out = px;
                    if flags.contains(RenderFlags::DOOR_FLIP_X) {
                        px_out = bs - 1 - px;
                    }
                    let shade = if west_side { WEST_SHADE } else { SOUTH_SHADE };
                    img.set_pixel(px_out, py - lift, shaded(color, shade, alpha));
                }
            }
        }
        img
    }

    fn plant_sprite(&self, id: u16) -> Image {
        let bs = self.block_size;
        let (color, alpha) = base_color(id, 0);
        let mut img = Image::new(bs, bs);
        let cx = bs / 2;
        for py in bs / 2..bs {
            let spread = (py - bs / 2) / 2 + 1;
            for px in cx - spread..cx + spread {
                if (px + py) % 2 == 0 {
                    img.set_pixel(px, py, shaded(color, TOP_SHADE, alpha));
                }
            }
        }
        img
    }

    /// Lily pads: a small rhombus floating at top-face height.
    fn pad_sprite(&self) -> Image {
        let bs = self.block_size;
        let (color, alpha) = base_color(111, 0);
        let mut img = Image::new(bs, bs);
        for py in bs / 8..(3 * bs / 8).max(bs / 8 + 1) {
            for px in bs / 4..3 * bs / 4 {
                if face_at(bs, px, py) == Some(Face::Top) {
                    img.set_pixel(px, py, shaded(color, TOP_SHADE, alpha));
                }
            }
        }
        img
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Face {
    Top,
    West,
    South,
}

/// Which cube face a sprite pixel belongs to, if any.
#[inline]
fn face_at(bs: i32, px: i32, py: i32) -> Option<Face> {
    let half = bs / 2;
    let ax = if px < half { half - 1 - px } else { px - half };
    if 2 * py >= ax && 2 * py < bs - ax {
        return Some(Face::Top);
    }
    if 2 * py >= bs - ax && 2 * (bs - 1 - py) >= ax {
        return Some(if px < half { Face::West } else { Face::South });
    }
    None
}

/// Whether a pixel lies on a face edge that the edge flags darken: the
/// upper-left top edge (north), the upper-right top edge (east) or the
/// bottom rim of the side faces.
#[inline]
fn on_shadow_edge(bs: i32, px: i32, py: i32, face: Face, edges: RenderFlags) -> bool {
    let half = bs / 2;
    let ax = if px < half { half - 1 - px } else { px - half };
    match face {
        Face::Top => {
            let on_boundary = 2 * py - ax <= 1;
            on_boundary
                && ((px < half && edges.contains(RenderFlags::EDGE_NORTH))
                    || (px >= half && edges.contains(RenderFlags::EDGE_EAST)))
        }
        Face::West | Face::South => {
            edges.contains(RenderFlags::EDGE_BOTTOM) && 2 * (bs - 1 - py) - ax <= 1
        }
    }
}

#[inline]
fn shaded(color: [u8; 3], shade: u32, alpha: u8) -> u32 {
    rgba_to_u32(
        (color[0] as u32 * shade / 255) as u8,
        (color[1] as u32 * shade / 255) as u8,
        (color[2] as u32 * shade / 255) as u8,
        alpha,
    )
}

fn tint(sprite: &mut Image, color: [u8; 3]) {
    for py in 0..sprite.height() {
        for px in 0..sprite.width() {
            let p = sprite.pixel(px, py);
            if p >> 24 == 0 {
                continue;
            }
            let r = ((p >> 16) & 0xFF) * color[0] as u32 / 255;
            let g = ((p >> 8) & 0xFF) * color[1] as u32 / 255;
            let b = (p & 0xFF) * color[2] as u32 / 255;
            sprite.set_pixel(px, py, (p & 0xFF00_0000) | (r << 16) | (g << 8) | b);
        }
    }
}

/// Base color and alpha per block id. Biome-tinted blocks use bright
/// bases so the tint multiplication dominates the final color.
fn base_color(id: u16, _data: u16) -> ([u8; 3], u8) {
    match id {
        1 => ([125, 125, 125], 255),  // stone
        2 => ([170, 190, 150], 255),  // grass (tinted)
        3 => ([134, 96, 67], 255),    // dirt
        4 => ([122, 122, 122], 255),  // cobblestone
        5 => ([156, 127, 78], 255),   // planks
        7 => ([51, 51, 51], 255),     // bedrock
        8 | 9 => ([49, 93, 196], WATER_ALPHA),
        12 => ([218, 210, 158], 255), // sand
        13 => ([136, 126, 126], 255), // gravel
        14 => ([143, 139, 124], 255), // gold ore
        15 => ([135, 130, 126], 255), // iron ore
        16 => ([115, 115, 115], 255), // coal ore
        17 => ([102, 81, 50], 255),   // log
        18 => ([150, 180, 140], 220), // leaves (tinted)
        20 => ([200, 220, 225], 110), // glass
        24 => ([216, 207, 155], 255), // sandstone
        31 => ([160, 185, 130], 255), // tall grass (tinted)
        35 => ([222, 222, 222], 255), // wool
        37 => ([255, 220, 0], 255),   // dandelion
        38 => ([219, 68, 26], 255),   // rose
        44 => ([160, 160, 160], 255), // slab
        48 => ([90, 108, 90], 255),   // mossy cobblestone
        49 => ([20, 18, 30], 255),    // obsidian
        54 | 95 | 146 => ([125, 91, 38], 255), // chests
        64 => ([148, 115, 72], 255),  // wooden door
        71 => ([190, 190, 190], 255), // iron door
        78 | 80 => ([240, 250, 250], 255), // snow
        82 => ([159, 164, 177], 255), // clay
        85 | 107 => ([143, 115, 73], 255), // fence, fence gate
        87 => ([188, 68, 68], 255),   // netherrack
        98 => ([122, 122, 122], 255), // stone bricks
        101 => ([172, 174, 176], 255), // iron bars
        102 => ([200, 220, 225], 130), // glass pane
        106 => ([130, 170, 120], 230), // vines (tinted)
        111 => ([90, 170, 90], 255),  // lily pad
        113 => ([44, 22, 26], 255),   // nether brick fence
        130 => ([44, 60, 66], 255),   // ender chest
        _ => ([160, 160, 160], 255),
    }
}

/// How many layers of the given alpha stack to at least `OPAQUE_ALPHA`.
/// Uses the same integer compositing as `Image::alpha_blit`.
fn water_layers_until_opaque(alpha: u8) -> i32 {
    let a = alpha as u32;
    let mut acc = 0u32;
    let mut layers = 0;
    while acc < OPAQUE_ALPHA && layers < 16 {
        acc += a * (255 - acc) / 255;
        layers += 1;
    }
    layers
}
