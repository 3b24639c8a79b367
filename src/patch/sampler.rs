// file: src/patch/sampler.rs
// description: seeded sampling of square patch offsets
// reference: https://docs.rs/rand_chacha

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Top-left corner of a patch in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PatchOffset {
    pub x: u32,
    pub y: u32,
}

/// Produces patch offsets for a source of a given size.
///
/// Every call to [`PatchSampler::offsets`] starts from a fresh generator seeded
/// with the same value, so two sources with equal dimensions always receive the
/// same offsets. That is what keeps an image and its mask aligned.
#[derive(Debug, Clone, Copy)]
pub struct PatchSampler {
    seed: u64,
}

impl PatchSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Number of distinct `size`x`size` windows in a `width`x`height` grid.
    pub fn positions(width: u32, height: u32, size: u32) -> u64 {
        if size == 0 || size > width || size > height {
            return 0;
        }
        u64::from(width - size + 1) * u64::from(height - size + 1)
    }

    /// Offsets for `max_patches` random windows, or every window in raster order
    /// when `max_patches` is `None`. The random count is capped at the number of
    /// distinct windows; windows are drawn with replacement and may repeat.
    pub fn offsets(
        &self,
        width: u32,
        height: u32,
        size: u32,
        max_patches: Option<usize>,
    ) -> Vec<PatchOffset> {
        let total = Self::positions(width, height, size);
        if total == 0 {
            return Vec::new();
        }

        let max_x = width - size;
        let max_y = height - size;

        let Some(requested) = max_patches else {
            return (0..=max_y)
                .flat_map(|y| (0..=max_x).map(move |x| PatchOffset { x, y }))
                .collect();
        };

        let count = usize::try_from(total).map_or(requested, |total| requested.min(total));
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        // rows first, then columns
        let rows: Vec<u32> = (0..count).map(|_| rng.random_range(0..=max_y)).collect();
        let cols: Vec<u32> = (0..count).map(|_| rng.random_range(0..=max_x)).collect();

        rows.into_iter()
            .zip(cols)
            .map(|(y, x)| PatchOffset { x, y })
            .collect()
    }
}
