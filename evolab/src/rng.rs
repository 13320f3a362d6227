use rand::Rng;

/// Returns `true` with probability `chance`.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

/// Returns a uniform draw in `[-magnitude, magnitude)`.
pub(crate) fn symmetric<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * magnitude
}

/// Returns a uniform draw in `[0, scale)`.
pub(crate) fn scaled<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> f32 {
    rng.gen::<f32>() * scale
}
