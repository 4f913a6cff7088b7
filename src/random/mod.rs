use rand::Rng;

use crate::types::{ColorId, PALETTE};

/// Uniform sample in `[min, max)`. Returns `min` for an empty range.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Uniform sample in `[-half_width, half_width)`.
pub fn centered<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> f32 {
    uniform(rng, -half_width, half_width)
}

pub fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> ColorId {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}
