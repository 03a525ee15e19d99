// --- Screen Dimensions ---
pub const GB_WIDTH: usize = 160;
pub const GB_HEIGHT: usize = 144;
pub const FRAME_BUFFER_SIZE: usize = GB_WIDTH * GB_HEIGHT;

// --- Mode Durations ---
// One scanline is 456 T-cycles = 114 groups of 4. The PPU is stepped once
// per machine cycle, so all durations below are in 4-T groups.
pub const OAM_SEARCH_GROUPS: u32 = 20; // mode 2, 80 T
pub const TRANSFER_GROUPS: u32 = 43; // mode 3, 172 T
pub const HBLANK_GROUPS: u32 = 51; // mode 0, 204 T
pub const SCANLINE_GROUPS: u32 = 114; // mode 1 lines, 456 T
pub const GLITCHED_OAM_GROUPS: u32 = 19; // first line after LCD enable

// --- PPU Modes (modes 0-3 are visible in STAT bits 0-1) ---
pub const MODE_HBLANK: u8 = 0;
pub const MODE_VBLANK: u8 = 1;
pub const MODE_OAM_SEARCH: u8 = 2;
pub const MODE_TRANSFER: u8 = 3;
pub const MODE_GLITCHED_OAM: u8 = 4;

// --- LCDC Flags (register 0xFF40) ---
pub const LCDC_BG_ENABLE: u8 = 1 << 0;
pub const LCDC_OBJ_ENABLE: u8 = 1 << 1;
pub const LCDC_OBJ_SIZE: u8 = 1 << 2; // 0 = 8x8, 1 = 8x16
pub const LCDC_BG_MAP: u8 = 1 << 3; // 0 = 0x9800, 1 = 0x9C00
pub const LCDC_TILE_DATA: u8 = 1 << 4; // 0 = signed from 0x9000, 1 = 0x8000
pub const LCDC_WINDOW_ENABLE: u8 = 1 << 5;
pub const LCDC_WINDOW_MAP: u8 = 1 << 6; // 0 = 0x9800, 1 = 0x9C00
pub const LCDC_LCD_ENABLE: u8 = 1 << 7;

// --- STAT Flags (register 0xFF41) ---
pub const STAT_LYC_FLAG: u8 = 1 << 2; // LY == LYC (read-only)
pub const STAT_LYC_ENABLE: u8 = 1 << 6;
// Bits 3/4/5 enable the mode 0/1/2 match sources; the source for mode `m`
// is bit `m + 3`, which the interrupt line logic exploits.

// --- OAM Attribute Flags (sprite byte 3) ---
pub const OAM_PALETTE: u8 = 1 << 4; // 0 = OBP0, 1 = OBP1
pub const OAM_X_FLIP: u8 = 1 << 5;
pub const OAM_Y_FLIP: u8 = 1 << 6;
pub const OAM_BEHIND_BG: u8 = 1 << 7;

/// The four LCD shades as ARGB, index 0 lightest.
pub const SHADES: [u32; 4] = [0xFFFF_F6D3, 0xFFF9_A875, 0xFFEB_6B6F, 0xFF7C_3F58];
