use glam::Vec2;

use super::entity::Viewport;
use super::rng::Rng;

/// Grid dimensions for `count` fish: roughly square cells that follow the
/// viewport's aspect ratio.
pub fn grid_dims(count: usize, viewport: Viewport) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = ((count as f32 * viewport.aspect()).sqrt().ceil() as usize).clamp(1, count);
    let rows = count.div_ceil(cols);
    (cols, rows)
}

/// One starting position per fish: each gets its own grid cell and a
/// random offset inside it, so the school starts spread out.
pub fn grid_positions(count: usize, viewport: Viewport, rng: &mut Rng) -> Vec<Vec2> {
    let (cols, rows) = grid_dims(count, viewport);
    if cols == 0 {
        return Vec::new();
    }
    let cell = Vec2::new(viewport.width / cols as f32, viewport.height / rows as f32);
    (0..count)
        .map(|i| {
            let origin = Vec2::new((i % cols) as f32 * cell.x, (i / cols) as f32 * cell.y);
            origin + Vec2::new(rng.range(0.1, 0.9) * cell.x, rng.range(0.1, 0.9) * cell.y)
        })
        .collect()
}
