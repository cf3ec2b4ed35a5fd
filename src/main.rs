/// Demo entry point: generates noise terrain around the origin and
/// renders a square of map tiles to one stitched PNG.
use anyhow::{Context, Result};
use glam::IVec2;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use isomap::{BlockImages, Image, TerrainConfig, TilePos, TileRenderer, World};

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let radius: i32 = match args.first() {
        Some(arg) => arg.parse().context("radius must be an integer")?,
        None => 2,
    };
    anyhow::ensure!(radius > 0, "radius must be positive, got {radius}");
    let output = args.get(1).cloned().unwrap_or_else(|| "map.png".to_string());

    // chunk square large enough that every tile in [-radius, radius)
    // sees generated terrain
    let chunk_reach = 3 * radius + 3;
    let config = TerrainConfig::default();
    let mut world = World::new();

    let generate_start = Instant::now();
    world.generate_region(
        IVec2::splat(-chunk_reach),
        IVec2::splat(chunk_reach),
        &config,
    );
    info!(
        chunks = world.chunk_count(),
        elapsed_ms = generate_start.elapsed().as_millis() as u64,
        "world generated"
    );

    let images = BlockImages::new(16);
    let renderer = TileRenderer::new(&world, &images, true);
    let tile_size = images.tile_size();

    let coords: Vec<TilePos> = (-radius..radius)
        .flat_map(|ty| (-radius..radius).map(move |tx| TilePos::new(tx, ty)))
        .collect();

    // each worker owns its output image; the renderer itself is shared
    // read-only
    let render_start = Instant::now();
    let tiles: Vec<(TilePos, Image)> = coords
        .par_iter()
        .map(|&tile| {
            let mut out = Image::new(0, 0);
            renderer.render_tile(tile, &mut out);
            (tile, out)
        })
        .collect();
    info!(
        tiles = tiles.len(),
        elapsed_ms = render_start.elapsed().as_millis() as u64,
        "tiles rendered"
    );

    let map_size = (2 * radius * tile_size) as u32;
    let mut map = image::RgbaImage::from_pixel(map_size, map_size, image::Rgba([24, 26, 38, 255]));
    for (tile, img) in &tiles {
        let off_x = (tile.x + radius) * tile_size;
        let off_y = (tile.y + radius) * tile_size;
        for py in 0..tile_size {
            for px in 0..tile_size {
                let pixel = img.pixel(px, py);
                let src = [
                    (pixel >> 16) as u8,
                    (pixel >> 8) as u8,
                    pixel as u8,
                    (pixel >> 24) as u8,
                ];
                let dst = map.get_pixel_mut((off_x + px) as u32, (off_y + py) as u32);
                blend_over(dst, src);
            }
        }
    }

    map.save(&output)
        .with_context(|| format!("failed to write {output}"))?;
    info!(output = %output, size = map_size, "map written");
    Ok(())
}

/// src-over of one RGBA pixel onto the stitched map.
fn blend_over(dst: &mut image::Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = image::Rgba(src);
        return;
    }
    let da = dst[3] as u32;
    let db = da * (255 - sa) / 255;
    let out_a = sa + db;
    if out_a == 0 {
        return;
    }
    for i in 0..3 {
        dst[i] = ((src[i] as u32 * sa + dst[i] as u32 * db) / out_a) as u8;
    }
    dst[3] = out_a as u8;
}
