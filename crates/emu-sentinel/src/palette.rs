//! Palettes as normalised RGBA, from the 6-bit-per-channel EGA colours.

pub type Rgba = [f32; 4];

const fn ega(r: u8, g: u8, b: u8) -> Rgba {
    [r as f32 / 63.0, g as f32 / 63.0, b as f32 / 63.0, 1.0]
}

pub const BLACK_INDEX: usize = 0;
pub const SKY_INDEX: usize = 7;
pub const WHITE_INDEX: usize = 14;
pub const DARK_BLUE_INDEX: usize = 15;

/// Darker and lighter slope shades appended after the 16 base colours.
pub const SLOPE_DARK_INDEX: usize = 0x10;
pub const SLOPE_LIGHT_INDEX: usize = 0x11;

const SLOPE_DARK_FACTOR: f32 = 0.6;
const SLOPE_LIGHT_FACTOR: f32 = 0.7;

pub const GAME_PALETTE: [Rgba; 16] = [
    ega(0x00, 0x00, 0x00), // black
    ega(0x27, 0x27, 0x3F), // mid-light blue, replaced per landscape
    ega(0x3F, 0x3F, 0x3F), // white, replaced per landscape
    ega(0x00, 0x3F, 0x00), // green, replaced per landscape
    ega(0x00, 0x1F, 0x00), // dark green
    ega(0x17, 0x37, 0x17), // mid green
    ega(0x3F, 0x00, 0x00), // red
    ega(0x00, 0x0F, 0x27), // mid blue
    ega(0x00, 0x3F, 0x00), // green
    ega(0x3F, 0x3F, 0x00), // yellow
    ega(0x27, 0x00, 0x27), // mid magenta
    ega(0x17, 0x2F, 0x2F), // mid cyan
    ega(0x27, 0x27, 0x3F), // mid-light blue
    ega(0x1F, 0x0F, 0x00), // brown
    ega(0x3F, 0x3F, 0x3F), // white
    ega(0x00, 0x00, 0x17), // dark blue
];

pub const TITLE_PALETTE: [Rgba; 16] = [
    ega(0x00, 0x00, 0x00),
    ega(0x00, 0x27, 0x17),
    ega(0x17, 0x3F, 0x3F),
    ega(0x1F, 0x1F, 0x37),
    ega(0x27, 0x0F, 0x0F),
    ega(0x0F, 0x0F, 0x27),
    ega(0x37, 0x1F, 0x1F),
    ega(0x00, 0x00, 0x1F),
    ega(0x0F, 0x0F, 0x27),
    ega(0x27, 0x27, 0x0F),
    ega(0x00, 0x00, 0x17),
    ega(0x00, 0x00, 0x0F),
    ega(0x0F, 0x0F, 0x37),
    ega(0x00, 0x00, 0x0F),
    ega(0x2F, 0x2F, 0x2F),
    ega(0x37, 0x37, 0x17),
];

// Entries 1, 2 and 3 of the game palette, indexed by sentry count.
const SENTRY_COLOURS_1: [Rgba; 8] = [
    ega(0x00, 0x27, 0x27),
    ega(0x27, 0x00, 0x27),
    ega(0x00, 0x27, 0x27),
    ega(0x37, 0x17, 0x00),
    ega(0x17, 0x17, 0x3F),
    ega(0x3F, 0x00, 0x00),
    ega(0x27, 0x00, 0x27),
    ega(0x17, 0x17, 0x3F),
];

const SENTRY_COLOURS_2: [Rgba; 8] = [
    ega(0x3F, 0x3F, 0x3F),
    ega(0x27, 0x3F, 0x3F),
    ega(0x3F, 0x2F, 0x2F),
    ega(0x3F, 0x3F, 0x3F),
    ega(0x27, 0x3F, 0x3F),
    ega(0x3F, 0x3F, 0x27),
    ega(0x3F, 0x27, 0x3F),
    ega(0x3F, 0x00, 0x00),
];

const SENTRY_COLOURS_3: [Rgba; 8] = [
    ega(0x00, 0x3F, 0x00),
    ega(0x3F, 0x3F, 0x27),
    ega(0x27, 0x3F, 0x3F),
    ega(0x3F, 0x3F, 0x27),
    ega(0x3F, 0x3F, 0x3F),
    ega(0x3F, 0x2F, 0x2F),
    ega(0x3F, 0x3F, 0x3F),
    ega(0x3F, 0x3F, 0x00),
];

fn shade(colour: Rgba, factor: f32) -> Rgba {
    [colour[0] * factor, colour[1] * factor, colour[2] * factor, colour[3]]
}

/// The 18-entry in-game palette for a landscape with `sentries` sentries.
/// Only the low 3 bits of the count are used.
#[must_use]
pub fn game_palette(sentries: u8) -> Vec<Rgba> {
    let n = usize::from(sentries & 7);
    let mut palette = GAME_PALETTE.to_vec();
    palette[1] = SENTRY_COLOURS_1[n];
    palette[2] = SENTRY_COLOURS_2[n];
    palette[3] = SENTRY_COLOURS_3[n];

    let slope = palette[2];
    palette.push(shade(slope, SLOPE_DARK_FACTOR));
    palette.push(shade(slope, SLOPE_LIGHT_FACTOR));
    palette
}

#[must_use]
pub fn title_palette() -> Vec<Rgba> {
    TITLE_PALETTE.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_palette_has_slope_shades() {
        let palette = game_palette(0);
        assert_eq!(palette.len(), 18);
        assert_eq!(palette[2], [1.0, 1.0, 1.0, 1.0]);
        assert!((palette[SLOPE_DARK_INDEX][0] - 0.6).abs() < 1e-6);
        assert!((palette[SLOPE_LIGHT_INDEX][1] - 0.7).abs() < 1e-6);
        assert_eq!(palette[SLOPE_DARK_INDEX][3], 1.0);
    }

    #[test]
    fn sentry_count_wraps_at_eight() {
        assert_eq!(game_palette(9), game_palette(1));
        assert_eq!(game_palette(0xFF), game_palette(7));
        assert_eq!(game_palette(7)[2], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn fixed_entries_do_not_change() {
        let palette = game_palette(5);
        assert_eq!(palette[SKY_INDEX], GAME_PALETTE[SKY_INDEX]);
        assert_eq!(palette[BLACK_INDEX], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn title_palette_is_static() {
        assert_eq!(title_palette().len(), 16);
        assert_eq!(title_palette()[WHITE_INDEX], TITLE_PALETTE[14]);
    }
}
