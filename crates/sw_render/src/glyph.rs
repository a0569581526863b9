//! Built-in bitmap font.
//!
//! A 5x7 pixel glyph set (uppercase, digits, a little punctuation) baked into
//! a one-row RGBA atlas at startup. Menu items, titles, and the score readout
//! all render through this — no font files to ship, no rasterizer dependency,
//! and the blocky look suits the game.
//!
//! Each glyph is seven rows of five bits, most significant bit leftmost.
//! Atlas cells are 6px wide (one column of padding) and 8px tall so nearest
//! sampling at any integer scale never bleeds into a neighbor.

use std::collections::HashMap;

use glam::Vec2;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
const CELL_WIDTH: u32 = GLYPH_WIDTH + 1;
const CELL_HEIGHT: u32 = GLYPH_HEIGHT + 1;

#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    ('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    (':', [0x00, 0x04, 0x00, 0x00, 0x00, 0x04, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
    ('-', [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00]),
    ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
    ('>', [0x10, 0x08, 0x04, 0x02, 0x04, 0x08, 0x10]),
];

pub struct GlyphFont {
    uv_index: HashMap<char, usize>,
    atlas_width: u32,
    atlas_height: u32,
}

impl GlyphFont {
    /// Texture key the main loop registers the baked atlas under.
    pub const TEXTURE_KEY: &'static str = "__glyphs";

    pub fn new() -> Self {
        let uv_index = GLYPHS
            .iter()
            .enumerate()
            .map(|(i, &(c, _))| (c, i))
            .collect();
        Self {
            uv_index,
            atlas_width: GLYPHS.len() as u32 * CELL_WIDTH,
            atlas_height: CELL_HEIGHT,
        }
    }

    /// Rasterize the atlas: white opaque pixels on transparent black, one
    /// cell per glyph along a single row. Tint comes from vertex color.
    pub fn bake_atlas(&self) -> (Vec<u8>, u32, u32) {
        let mut pixels = vec![0u8; (self.atlas_width * self.atlas_height * 4) as usize];
        for (i, &(_, rows)) in GLYPHS.iter().enumerate() {
            let cell_x = i as u32 * CELL_WIDTH;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let x = cell_x + col;
                        let y = row as u32;
                        let offset = ((y * self.atlas_width + x) * 4) as usize;
                        pixels[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
                    }
                }
            }
        }
        (pixels, self.atlas_width, self.atlas_height)
    }

    /// UV sub-rectangle for a drawable character, None for anything else
    /// (spaces and unknown characters advance without drawing).
    pub fn uv_for(&self, c: char) -> Option<[f32; 4]> {
        let &index = self.uv_index.get(&c)?;
        let u0 = (index as u32 * CELL_WIDTH) as f32 / self.atlas_width as f32;
        let u1 = (index as u32 * CELL_WIDTH + GLYPH_WIDTH) as f32 / self.atlas_width as f32;
        let v1 = GLYPH_HEIGHT as f32 / self.atlas_height as f32;
        Some([u0, 0.0, u1, v1])
    }

    pub fn glyph_size(&self, scale: f32) -> Vec2 {
        Vec2::new(GLYPH_WIDTH as f32 * scale, GLYPH_HEIGHT as f32 * scale)
    }

    pub fn advance(&self, scale: f32) -> f32 {
        CELL_WIDTH as f32 * scale
    }

    /// Pixel width of a string, without the trailing pad column.
    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.advance(scale) - scale
    }

    pub fn line_height(&self, scale: f32) -> f32 {
        CELL_HEIGHT as f32 * scale
    }
}

impl Default for GlyphFont {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_dimensions_match_glyph_count() {
        let font = GlyphFont::new();
        let (pixels, width, height) = font.bake_atlas();
        assert_eq!(width, GLYPHS.len() as u32 * CELL_WIDTH);
        assert_eq!(height, CELL_HEIGHT);
        assert_eq!(pixels.len(), (width * height * 4) as usize);
    }

    #[test]
    fn every_glyph_resolves_to_uv_inside_unit_square() {
        let font = GlyphFont::new();
        for &(c, _) in GLYPHS {
            let [u0, v0, u1, v1] = font.uv_for(c).expect("glyph should resolve");
            assert!(u0 < u1 && v0 < v1);
            assert!((0.0..=1.0).contains(&u0) && (0.0..=1.0).contains(&u1));
            assert!((0.0..=1.0).contains(&v1));
        }
    }

    #[test]
    fn space_and_unknown_characters_have_no_uv() {
        let font = GlyphFont::new();
        assert!(font.uv_for(' ').is_none());
        assert!(font.uv_for('~').is_none());
        assert!(font.uv_for('a').is_none());
    }

    #[test]
    fn glyph_t_renders_its_top_bar() {
        let font = GlyphFont::new();
        let (pixels, _, _) = font.bake_atlas();
        let index = GLYPHS.iter().position(|&(c, _)| c == 'T').expect("T exists");
        let cell_x = index as u32 * CELL_WIDTH;
        // Top row of 'T' is fully lit; offsets are in row 0, so the atlas
        // width drops out of the indexing.
        for col in 0..GLYPH_WIDTH {
            let offset = ((cell_x + col) * 4) as usize;
            assert_eq!(pixels[offset + 3], 255, "alpha at top row col {col}");
        }
        // Padding column stays transparent.
        let pad_offset = ((cell_x + GLYPH_WIDTH) * 4) as usize;
        assert_eq!(pixels[pad_offset + 3], 0);
    }

    #[test]
    fn measure_drops_trailing_pad() {
        let font = GlyphFont::new();
        assert_eq!(font.measure("", 2.0), 0.0);
        let one = font.measure("A", 2.0);
        assert_eq!(one, GLYPH_WIDTH as f32 * 2.0);
        let two = font.measure("AB", 2.0);
        assert_eq!(two, one + font.advance(2.0));
    }
}
