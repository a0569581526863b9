//! CPU-side sprite mesh builder.
//!
//! Screens emit quads and text into a `SpriteBatch` each frame; the main loop
//! streams the result into GPU buffers and replays `draw_calls` over one
//! vertex/index buffer pair. Consecutive quads that share a texture merge into
//! a single indexed draw, so emission order doubles as the batching strategy:
//! group same-texture sprites together and the whole field renders in a
//! handful of calls.

use std::sync::Arc;

use glam::Vec2;

use crate::glyph::GlyphFont;
use crate::vertex::SpriteVertex;

#[derive(Debug, Clone)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Full-texture quad with its top-left corner at `top_left`.
    pub fn quad(&mut self, texture_key: &str, top_left: Vec2, size: Vec2, color: [f32; 4]) {
        self.quad_uv(texture_key, top_left, size, [0.0, 0.0, 1.0, 1.0], color);
    }

    /// Quad sampling the `[u0, v0, u1, v1]` sub-rectangle of the texture.
    pub fn quad_uv(
        &mut self,
        texture_key: &str,
        top_left: Vec2,
        size: Vec2,
        uv: [f32; 4],
        color: [f32; 4],
    ) {
        let [u0, v0, u1, v1] = uv;
        let base_index = self.vertices.len() as u32;

        // Y-down playfield: v increases with y.
        self.vertices.push(SpriteVertex {
            position: [top_left.x, top_left.y],
            tex_coords: [u0, v0],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [top_left.x + size.x, top_left.y],
            tex_coords: [u1, v0],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [top_left.x + size.x, top_left.y + size.y],
            tex_coords: [u1, v1],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [top_left.x, top_left.y + size.y],
            tex_coords: [u0, v1],
            color,
        });

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(Arc::from(texture_key), draw_start, 6);
    }

    /// Emit `text` with the built-in glyph font, top-left anchored.
    /// Characters outside the font's repertoire advance without drawing.
    pub fn text(
        &mut self,
        font: &GlyphFont,
        text: &str,
        top_left: Vec2,
        scale: f32,
        color: [f32; 4],
    ) {
        let mut pen_x = top_left.x;
        for c in text.chars() {
            if let Some(uv) = font.uv_for(c) {
                self.quad_uv(
                    GlyphFont::TEXTURE_KEY,
                    Vec2::new(pen_x, top_left.y),
                    font.glyph_size(scale),
                    uv,
                    color,
                );
            }
            pen_x += font.advance(scale);
        }
    }

    /// Merge with the previous call when the texture matches and the index
    /// ranges are contiguous.
    fn push_draw_call(&mut self, texture_key: Arc<str>, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if *last.texture_key == *texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key,
            index_start,
            index_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_emits_four_vertices_six_indices() {
        let mut batch = SpriteBatch::new();
        batch.quad("ship", Vec2::ZERO, Vec2::new(48.0, 32.0), [1.0; 4]);
        assert_eq!(batch.vertices.len(), 4);
        assert_eq!(batch.indices.len(), 6);
        assert_eq!(batch.draw_calls.len(), 1);
    }

    #[test]
    fn same_texture_quads_merge_into_one_draw_call() {
        let mut batch = SpriteBatch::new();
        for i in 0..5 {
            batch.quad("enemy", Vec2::new(i as f32 * 47.0, 100.0), Vec2::splat(32.0), [1.0; 4]);
        }
        assert_eq!(batch.draw_calls.len(), 1);
        assert_eq!(batch.draw_calls[0].index_count, 30);
    }

    #[test]
    fn texture_change_splits_draw_calls() {
        let mut batch = SpriteBatch::new();
        batch.quad("ship", Vec2::ZERO, Vec2::splat(32.0), [1.0; 4]);
        batch.quad("enemy", Vec2::ZERO, Vec2::splat(32.0), [1.0; 4]);
        batch.quad("enemy", Vec2::ZERO, Vec2::splat(32.0), [1.0; 4]);
        batch.quad("ship", Vec2::ZERO, Vec2::splat(32.0), [1.0; 4]);
        assert_eq!(batch.draw_calls.len(), 3);
    }

    #[test]
    fn quad_corners_are_y_down() {
        let mut batch = SpriteBatch::new();
        batch.quad("ship", Vec2::new(10.0, 20.0), Vec2::new(4.0, 16.0), [1.0; 4]);
        assert_eq!(batch.vertices[0].position, [10.0, 20.0]);
        assert_eq!(batch.vertices[2].position, [14.0, 36.0]);
        // Top-left vertex samples the top of the texture.
        assert_eq!(batch.vertices[0].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn text_advances_one_cell_per_character_including_spaces() {
        let font = GlyphFont::new();
        let mut batch = SpriteBatch::new();
        batch.text(&font, "A B", Vec2::ZERO, 2.0, [1.0; 4]);
        // Two drawable glyphs; the space only advances the pen.
        assert_eq!(batch.quad_count(), 2);
        let second_glyph_x = batch.vertices[4].position[0];
        assert_eq!(second_glyph_x, 2.0 * font.advance(2.0));
    }

    #[test]
    fn clear_resets_everything() {
        let mut batch = SpriteBatch::new();
        batch.quad("ship", Vec2::ZERO, Vec2::splat(8.0), [1.0; 4]);
        batch.clear();
        assert!(batch.vertices.is_empty());
        assert!(batch.indices.is_empty());
        assert!(batch.draw_calls.is_empty());
    }
}
