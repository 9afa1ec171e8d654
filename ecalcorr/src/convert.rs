#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn usize_from_f64(x: f64) -> usize {
    x.max(0.0) as usize
}

#[allow(clippy::cast_precision_loss)]
pub const fn f64_from_usize(x: usize) -> f64 {
    x as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn u64_from_f64_ceil(x: f64) -> u64 {
    x.ceil().max(0.0) as u64
}
