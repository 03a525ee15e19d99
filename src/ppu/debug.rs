//! VRAM tile-sheet view: renders all 384 tile patterns into a side buffer
//! for inspection. Presentation-only, never consulted by the mode machine.

use super::constants::*;
use super::Ppu;

pub const TILES_PER_ROW: usize = 16;
pub const TILE_COUNT: usize = 384; // 0x8000-0x97FF, 16 bytes each
pub const TILE_VIEW_WIDTH: usize = TILES_PER_ROW * 8;
pub const TILE_VIEW_HEIGHT: usize = TILE_COUNT / TILES_PER_ROW * 8;
pub const TILE_VIEW_SIZE: usize = TILE_VIEW_WIDTH * TILE_VIEW_HEIGHT;

impl Ppu {
    /// Redraws the tile sheet from the current VRAM contents. The host calls
    /// this at its own cadence (typically once per presented frame while the
    /// view is open).
    pub fn render_tile_view(&mut self, vram: &[u8]) {
        for tile in 0..TILE_COUNT {
            let base_x = tile % TILES_PER_ROW * 8;
            let base_y = tile / TILES_PER_ROW * 8;

            for row in 0..8 {
                let offset = tile * 16 + row * 2;
                let (byte1, byte2) = (vram[offset], vram[offset + 1]);

                for column in 0..8 {
                    let bit1 = (byte1 >> (7 - column)) & 0x1;
                    let bit2 = (byte2 >> (7 - column)) & 0x1;
                    let color = (bit2 << 1) | bit1;
                    self.tile_view[(base_y + row) * TILE_VIEW_WIDTH + base_x + column] =
                        SHADES[color as usize];
                }
            }
        }
    }

    /// The tile-sheet buffer, 128x192 ARGB row-major.
    pub fn tile_view(&self) -> &[u32] {
        &self.tile_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_view_lays_tiles_out_in_a_grid() {
        let mut ppu = Ppu::new();
        let mut vram = vec![0u8; 0x2000];
        // Tile 17 (grid position 1,1) drawn solid color 3.
        for row in 0..8 {
            vram[17 * 16 + row * 2] = 0xFF;
            vram[17 * 16 + row * 2 + 1] = 0xFF;
        }
        ppu.render_tile_view(&vram);

        assert_eq!(ppu.tile_view()[8 * TILE_VIEW_WIDTH + 8], SHADES[3]);
        assert_eq!(ppu.tile_view()[0], SHADES[0]);
    }
}
