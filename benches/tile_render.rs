/// Benchmark suite for the tile rendering pipeline.
/// Covers the end-to-end tile path and the hot primitives behind it.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::IVec2;

use isomap::{
    BlockImages, BlockPos, Image, TerrainConfig, TilePos, TileRenderer, TopBlockIterator, World,
};

fn terrain_world() -> World {
    let mut world = World::new();
    world.generate_region(IVec2::new(-6, -6), IVec2::new(6, 6), &TerrainConfig::default());
    world
}

fn bench_render_tile(c: &mut Criterion) {
    c.bench_function("render_tile_terrain", |b| {
        let world = terrain_world();
        let images = BlockImages::new(16);
        let renderer = TileRenderer::new(&world, &images, true);
        let mut out = Image::new(0, 0);

        b.iter(|| {
            renderer.render_tile(black_box(TilePos::new(0, 0)), &mut out);
        });
    });
}

fn bench_render_empty_tile(c: &mut Criterion) {
    c.bench_function("render_tile_empty", |b| {
        let world = World::new();
        let images = BlockImages::new(16);
        let renderer = TileRenderer::new(&world, &images, true);
        let mut out = Image::new(0, 0);

        b.iter(|| {
            renderer.render_tile(black_box(TilePos::new(0, 0)), &mut out);
        });
    });
}

fn bench_top_iterator_walk(c: &mut Criterion) {
    c.bench_function("top_iterator_walk", |b| {
        b.iter(|| {
            let mut it = TopBlockIterator::new(black_box(TilePos::new(0, 0)), 16);
            let mut cells = 0u32;
            while !it.end() {
                cells += 1;
                it.next();
            }
            black_box(cells)
        });
    });
}

fn bench_check_neighbors(c: &mut Criterion) {
    c.bench_function("check_neighbors_fence", |b| {
        let mut world = World::new();
        let pos = BlockPos::new(0, 64, 0);
        world.set_block(pos, 85, 0);
        world.set_block(BlockPos::new(1, 64, 0), 85, 0);
        world.set_block(BlockPos::new(0, 64, -1), 107, 0);
        let images = BlockImages::new(16);
        let renderer = TileRenderer::new(&world, &images, false);

        b.iter(|| black_box(renderer.check_neighbors(black_box(pos), None, 85, 0)));
    });
}

fn bench_alpha_blit(c: &mut Criterion) {
    c.bench_function("alpha_blit_block_sprite", |b| {
        let images = BlockImages::new(16);
        let sprite = images.get_block(9, 0);
        let mut tile = Image::new(256, 256);

        b.iter(|| {
            tile.alpha_blit(black_box(&sprite), 120, 120);
        });
    });
}

criterion_group!(
    benches,
    bench_render_tile,
    bench_render_empty_tile,
    bench_top_iterator_walk,
    bench_check_neighbors,
    bench_alpha_blit
);
criterion_main!(benches);
