//! Palette atlas generation.
//!
//! The atlas is a single-row RGBA8 strip with one square cell per material.
//! A cell is the material's fill color with a rim of its edge color, so the
//! sampled texture outlines every voxel face. Glow materials are marked in
//! the alpha channel; the shader renders them unshaded.

use voxide_core::palette::{MATERIAL_COUNT, Palette};

/// Edge length of one material cell in texels.
pub const ATLAS_CELL: u32 = 16;

/// Width of the edge-color rim inside each cell, in texels.
const RIM_WIDTH: u32 = 2;

/// Alpha value marking a glow (emissive) texel.
const GLOW_ALPHA: u8 = 0;

/// CPU-side palette atlas, ready for texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    /// Tightly packed RGBA8 texels, row-major.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterize the palette into its atlas strip.
pub fn build_atlas(palette: &Palette) -> AtlasImage {
    let width = ATLAS_CELL * MATERIAL_COUNT as u32;
    let height = ATLAS_CELL;
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for material in 0..MATERIAL_COUNT {
        let fill = palette.colors[material];
        let edge = palette.edge_colors[material];
        let alpha = if palette.glows[material] {
            GLOW_ALPHA
        } else {
            0xff
        };
        let cell_x = material as u32 * ATLAS_CELL;

        for y in 0..ATLAS_CELL {
            for x in 0..ATLAS_CELL {
                let on_rim = x < RIM_WIDTH
                    || x >= ATLAS_CELL - RIM_WIDTH
                    || y < RIM_WIDTH
                    || y >= ATLAS_CELL - RIM_WIDTH;
                let color = if on_rim { edge } else { fill };
                let offset = (((y * width) + cell_x + x) * 4) as usize;
                pixels[offset] = color.r;
                pixels[offset + 1] = color.g;
                pixels[offset + 2] = color.b;
                pixels[offset + 3] = alpha;
            }
        }
    }

    AtlasImage {
        pixels,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxide_core::palette::Color;

    fn texel(atlas: &AtlasImage, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * atlas.width + x) * 4) as usize;
        [
            atlas.pixels[offset],
            atlas.pixels[offset + 1],
            atlas.pixels[offset + 2],
            atlas.pixels[offset + 3],
        ]
    }

    #[test]
    fn test_atlas_dimensions() {
        let atlas = build_atlas(&Palette::default());
        assert_eq!(atlas.width, ATLAS_CELL * 8);
        assert_eq!(atlas.height, ATLAS_CELL);
        assert_eq!(
            atlas.pixels.len(),
            (atlas.width * atlas.height * 4) as usize
        );
    }

    #[test]
    fn test_cell_interior_is_fill_color() {
        let mut palette = Palette::default();
        palette.colors[2] = Color::rgb(10, 20, 30);

        let atlas = build_atlas(&palette);
        let center = ATLAS_CELL / 2;
        assert_eq!(
            texel(&atlas, 2 * ATLAS_CELL + center, center),
            [10, 20, 30, 0xff]
        );
    }

    #[test]
    fn test_cell_border_is_edge_color() {
        let mut palette = Palette::default();
        palette.edge_colors[0] = Color::rgb(1, 2, 3);

        let atlas = build_atlas(&palette);
        assert_eq!(texel(&atlas, 0, 0), [1, 2, 3, 0xff]);
        assert_eq!(texel(&atlas, ATLAS_CELL - 1, ATLAS_CELL / 2), [1, 2, 3, 0xff]);
    }

    #[test]
    fn test_glow_marks_alpha_across_cell() {
        let mut palette = Palette::default();
        palette.glows[5] = true;

        let atlas = build_atlas(&palette);
        for y in 0..ATLAS_CELL {
            for x in 0..ATLAS_CELL {
                assert_eq!(texel(&atlas, 5 * ATLAS_CELL + x, y)[3], GLOW_ALPHA);
            }
        }
        // Neighboring cells stay opaque.
        assert_eq!(texel(&atlas, 4 * ATLAS_CELL, 0)[3], 0xff);
    }
}
