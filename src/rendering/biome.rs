//! Biome color table for grass and foliage tinting.
//!
//! Components are kept wide so a 3x3 neighborhood can be summed in place
//! and divided by the sample count afterwards.

use std::ops::{AddAssign, DivAssign};

/// Grass tint plus climate channels of one biome.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Biome {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub temperature: f32,
    pub rainfall: f32,
}

impl Biome {
    pub const fn new(r: u32, g: u32, b: u32, temperature: f32, rainfall: f32) -> Self {
        Self {
            r,
            g,
            b,
            temperature,
            rainfall,
        }
    }

    #[inline]
    pub fn color(&self) -> [u8; 3] {
        [self.r as u8, self.g as u8, self.b as u8]
    }
}

impl AddAssign for Biome {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
        self.temperature += rhs.temperature;
        self.rainfall += rhs.rainfall;
    }
}

impl DivAssign<u32> for Biome {
    fn div_assign(&mut self, count: u32) {
        self.r /= count;
        self.g /= count;
        self.b /= count;
        self.temperature /= count as f32;
        self.rainfall /= count as f32;
    }
}

/// Biome used whenever biome rendering is off or an id is out of range.
pub const DEFAULT_BIOME: usize = 21;

pub const BIOMES: [Biome; 23] = [
    Biome::new(141, 179, 96, 0.50, 0.50), // 0  ocean
    Biome::new(145, 189, 89, 0.80, 0.40), // 1  plains
    Biome::new(191, 183, 85, 2.00, 0.00), // 2  desert
    Biome::new(136, 163, 110, 0.20, 0.30), // 3  extreme hills
    Biome::new(121, 180, 95, 0.70, 0.80), // 4  forest
    Biome::new(134, 162, 120, 0.05, 0.80), // 5  taiga
    Biome::new(106, 148, 104, 0.80, 0.90), // 6  swampland
    Biome::new(141, 179, 96, 0.50, 0.50), // 7  river
    Biome::new(191, 183, 85, 2.00, 0.00), // 8  nether
    Biome::new(141, 179, 96, 0.50, 0.50), // 9  end
    Biome::new(131, 160, 136, 0.00, 0.50), // 10 frozen ocean
    Biome::new(131, 160, 136, 0.00, 0.50), // 11 frozen river
    Biome::new(131, 160, 136, 0.00, 0.50), // 12 ice plains
    Biome::new(131, 160, 136, 0.00, 0.50), // 13 ice mountains
    Biome::new(85, 201, 63, 0.90, 1.00),  // 14 mushroom island
    Biome::new(85, 201, 63, 0.90, 1.00),  // 15 mushroom island shore
    Biome::new(145, 189, 89, 0.80, 0.40), // 16 beach
    Biome::new(191, 183, 85, 2.00, 0.00), // 17 desert hills
    Biome::new(121, 180, 95, 0.70, 0.80), // 18 forest hills
    Biome::new(134, 162, 120, 0.05, 0.80), // 19 taiga hills
    Biome::new(136, 163, 110, 0.20, 0.30), // 20 extreme hills edge
    Biome::new(83, 202, 55, 1.20, 0.90),  // 21 jungle
    Biome::new(83, 202, 55, 1.20, 0.90),  // 22 jungle hills
];
