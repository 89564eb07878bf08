pub const GENERATION_SEED: u32 = 0x5EED_9195;

const SHAPE_SALT: u32 = 0x5A4E_0000;
const ROTATION_SALT: u32 = 0xC001_0000;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

/// Uniform pick in `0..len`; `len` must be non-zero.
pub fn rand_index(seed: u32, salt: u32, len: usize) -> usize {
    let pick = (rand_unit(seed, salt) * len as f32) as usize;
    pick.min(len.saturating_sub(1))
}

pub fn cell_seed(base: u32, width: usize, height: usize) -> u32 {
    let grid = ((width as u32) << 16) ^ (height as u32);
    base ^ grid ^ 0x91BE_5EED
}

pub fn shape_pick(seed: u32, index: usize, len: usize) -> usize {
    rand_index(seed, SHAPE_SALT.wrapping_add(index as u32), len)
}

pub fn rotation_pick(seed: u32, index: usize) -> i32 {
    rand_index(seed, ROTATION_SALT.wrapping_add(index as u32), 4) as i32
}
