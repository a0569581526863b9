//! Built-in sprite art.
//!
//! Sprites are authored as character grids and rasterized to RGBA at startup,
//! so the game runs with zero asset files on disk. Dropping a PNG at the
//! matching `assets/sprites/<key>.png` path overrides the built-in art; the
//! main loop tries the file first and falls back here.
//!
//! The enemy and laser grids are near-white on purpose: the wave tints
//! enemies by spawn count and lasers draw with a green tint, both through
//! vertex color.

use std::path::PathBuf;

pub const SHIP: &str = "ship";
pub const ENEMY: &str = "enemy";
pub const LASER: &str = "laser";
pub const STAR: &str = "star";
/// 1x1 white pixel for untextured fills (menu backdrops, flashes).
pub const WHITE: &str = "__white";

/// Pattern cells are doubled so the art lands at playfield scale.
const PIXEL_SCALE: u32 = 2;

pub struct SpriteArt {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[rustfmt::skip]
const SHIP_ROWS: &[&str] = &[
    "...........##...........",
    "...........##...........",
    "..........####..........",
    "..........#++#..........",
    ".........##++##.........",
    ".........##++##.........",
    "........###++###........",
    "........########........",
    ".......##########.......",
    "..##...##########...##..",
    "..##..############..##..",
    ".######################.",
    "########################",
    "###..##############..###",
    "##....####....####....##",
    "#......##......##......#",
];

#[rustfmt::skip]
const ENEMY_ROWS: &[&str] = &[
    "....##....##....",
    "....##....##....",
    ".....##..##.....",
    "..############..",
    ".##############.",
    "###oo######oo###",
    "################",
    "################",
    "####.######.####",
    "###..##..##..###",
    "##....####....##",
    "##..##....##..##",
    "....##....##....",
    "..##........##..",
    ".##..........##.",
    "##............##",
];

#[rustfmt::skip]
const LASER_ROWS: &[&str] = &[
    "##",
    "##",
    "##",
    "##",
    "##",
    "##",
    "##",
    "##",
];

const STAR_ROWS: &[&str] = &["#"];

pub fn builtin_art(key: &str) -> Option<SpriteArt> {
    match key {
        SHIP => Some(rasterize(SHIP_ROWS, PIXEL_SCALE, ship_palette)),
        ENEMY => Some(rasterize(ENEMY_ROWS, PIXEL_SCALE, enemy_palette)),
        LASER => Some(rasterize(LASER_ROWS, PIXEL_SCALE, white_palette)),
        STAR => Some(rasterize(STAR_ROWS, PIXEL_SCALE, white_palette)),
        WHITE => Some(rasterize(STAR_ROWS, 1, white_palette)),
        _ => None,
    }
}

/// Where a PNG override for this sprite would live.
pub fn override_path(key: &str) -> PathBuf {
    PathBuf::from(format!("assets/sprites/{key}.png"))
}

fn ship_palette(c: char) -> Option<[u8; 4]> {
    match c {
        '#' => Some([176, 188, 204, 255]),
        '+' => Some([80, 220, 255, 255]),
        _ => None,
    }
}

fn enemy_palette(c: char) -> Option<[u8; 4]> {
    match c {
        '#' => Some([235, 235, 235, 255]),
        'o' => Some([30, 30, 30, 255]),
        _ => None,
    }
}

fn white_palette(c: char) -> Option<[u8; 4]> {
    match c {
        '#' => Some([255, 255, 255, 255]),
        _ => None,
    }
}

fn rasterize(
    rows: &[&str],
    scale: u32,
    palette: impl Fn(char) -> Option<[u8; 4]>,
) -> SpriteArt {
    let grid_height = rows.len() as u32;
    let grid_width = rows[0].len() as u32;
    debug_assert!(
        rows.iter().all(|row| row.len() as u32 == grid_width),
        "ragged sprite pattern"
    );

    let width = grid_width * scale;
    let height = grid_height * scale;
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for (grid_y, row) in rows.iter().enumerate() {
        for (grid_x, cell) in row.chars().enumerate() {
            let Some(rgba) = palette(cell) else {
                continue;
            };
            for sub_y in 0..scale {
                for sub_x in 0..scale {
                    let x = grid_x as u32 * scale + sub_x;
                    let y = grid_y as u32 * scale + sub_y;
                    let offset = ((y * width + x) * 4) as usize;
                    pixels[offset..offset + 4].copy_from_slice(&rgba);
                }
            }
        }
    }

    SpriteArt {
        pixels,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_rectangular() {
        for rows in [SHIP_ROWS, ENEMY_ROWS, LASER_ROWS, STAR_ROWS] {
            let width = rows[0].len();
            assert!(rows.iter().all(|row| row.len() == width));
        }
    }

    #[test]
    fn ship_art_dimensions_follow_scale() {
        let art = builtin_art(SHIP).expect("ship art exists");
        assert_eq!(art.width, 24 * PIXEL_SCALE);
        assert_eq!(art.height, 16 * PIXEL_SCALE);
        assert_eq!(art.pixels.len(), (art.width * art.height * 4) as usize);
    }

    #[test]
    fn enemy_art_is_square_and_mostly_opaque() {
        let art = builtin_art(ENEMY).expect("enemy art exists");
        assert_eq!(art.width, art.height);
        let opaque = art.pixels.chunks_exact(4).filter(|px| px[3] == 255).count();
        assert!(opaque > 0);
    }

    #[test]
    fn white_is_a_single_opaque_pixel() {
        let art = builtin_art(WHITE).expect("white art exists");
        assert_eq!((art.width, art.height), (1, 1));
        assert_eq!(art.pixels, vec![255, 255, 255, 255]);
    }

    #[test]
    fn unknown_key_has_no_art() {
        assert!(builtin_art("missile").is_none());
    }

    #[test]
    fn override_path_uses_key() {
        assert_eq!(
            override_path(ENEMY),
            PathBuf::from("assets/sprites/enemy.png")
        );
    }
}
