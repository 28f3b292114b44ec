//! Conversions between the game's 8-bit angles and radians.

use std::f32::consts::TAU;

/// Pitch byte to radians. Approximate.
#[must_use]
pub fn pitch_to_radians(value: u8) -> f32 {
    let steps = 0xF5u8.wrapping_sub(value) as i8;
    (f32::from(steps) * 6.25 + 11.0) / 256.0
}

/// Radians to the nearest lower pitch byte.
#[must_use]
pub fn radians_to_pitch(radians: f32) -> u8 {
    let steps = ((radians * 256.0 - 11.0) / 6.25) as i8;
    0xF5u8.wrapping_sub(steps as u8)
}

/// Yaw byte (1/256ths of a turn, 0 facing away) to radians.
#[must_use]
pub fn yaw_to_radians(value: u8) -> f32 {
    f32::from(value) / 256.0 * TAU
}

#[must_use]
pub fn radians_to_yaw(radians: f32) -> u8 {
    (radians * 256.0 / TAU) as i32 as u8
}
