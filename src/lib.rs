//! A cycle-accurate DMG emulator core.
//!
//! The facade couples the interpreter to the bus: `tick()` advances one CPU
//! instruction, and every bus access inside that instruction steps the
//! timer, OAM DMA and PPU by one machine cycle. Presentation, input mapping
//! and audio live outside; the host talks to [`GameBoy`] only.

use std::path::Path;
use std::time::{Duration, Instant};

pub mod cartridge;
pub mod cpu;
pub mod instruction;
pub mod joypad;
pub mod mbc;
pub mod memory;
pub mod memory_map;
pub mod ppu;
pub mod timer;

use cpu::Cpu;
use memory::Memory;
use memory_map::{BOOT_OFF_ADDR, BOOT_ROM_SIZE, IF_ADDR, SB_ADDR, SC_ADDR};

pub use joypad::Key;
pub use ppu::{GB_HEIGHT, GB_WIDTH, TILE_VIEW_HEIGHT, TILE_VIEW_WIDTH};

/// Cycle budget released per wall-clock frame: 4194304 Hz / 60. Pacing
/// only; the PPU's own frame is 70224 T-cycles (≈ 59.73 Hz).
const FRAME_BUDGET: u64 = 69905;
const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

pub struct GameBoy {
    cpu: Cpu,
    memory: Memory,
    /// When set, the internal rate budget is bypassed and `tick()` always
    /// executes an instruction.
    pub speed: bool,
    budget: u64, // total_cycles value at which the current frame budget ends
    last: Instant,
}

impl GameBoy {
    pub fn new() -> Self {
        GameBoy {
            cpu: Cpu::new(),
            memory: Memory::new(),
            speed: false,
            budget: FRAME_BUDGET,
            last: Instant::now(),
        }
    }

    /// Resets every component to its power-on state. Register presets depend
    /// on whether a boot ROM image is installed: with one, execution starts
    /// at 0x0000 inside the boot ROM; without, the post-boot state is
    /// applied and execution starts at 0x0100.
    pub fn init(&mut self) {
        self.memory.init();
        let skip_boot = !self.memory.boot_enabled();
        self.cpu.init(skip_boot);
        if skip_boot {
            self.memory.lcd.lcdc = 0x91;
            self.memory.lcd.stat = 0x85;
            self.memory.lcd.bgp = 0xFC;
            self.memory.lcd.obp0 = 0xFF;
            self.memory.lcd.obp1 = 0xFF;
            self.memory.write_internal(IF_ADDR, 0xE1);
            self.memory.write_internal(BOOT_OFF_ADDR, 0x01);
        }
        self.budget = FRAME_BUDGET;
        self.last = Instant::now();
    }

    /// Loads a cartridge image and resets the machine. On failure
    /// [`GameBoy::loaded`] stays false and the machine idles.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) {
        self.memory.cartridge.load(path);
        self.init();
    }

    /// Installs a 256-byte boot ROM image and resets so it takes effect.
    pub fn load_boot<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) if bytes.len() == BOOT_ROM_SIZE => {
                let mut image = [0; BOOT_ROM_SIZE];
                image.copy_from_slice(&bytes);
                self.memory.install_boot(image);
                self.init();
            }
            Ok(bytes) => {
                log::error!(
                    "boot ROM {} is {} bytes, expected {BOOT_ROM_SIZE}",
                    path.display(),
                    bytes.len()
                );
            }
            Err(err) => log::error!("failed to read boot ROM {}: {err}", path.display()),
        }
    }

    /// Advances the machine by at most one CPU instruction. The host calls
    /// this in a tight loop; an internal budget of one frame's cycles per
    /// 1/60 s keeps emulation at hardware speed unless `speed` is set.
    pub fn tick(&mut self) {
        if self.speed {
            self.budget = self.cpu.total_cycles().wrapping_add(FRAME_BUDGET);
        }

        if self.memory.cartridge.loaded && self.cpu.total_cycles() < self.budget {
            self.cpu.cycle(&mut self.memory);
        }

        if self.last.elapsed() >= FRAME_DURATION {
            self.last = Instant::now();
            if self.memory.cartridge.loaded && !self.speed {
                self.budget = self.budget.wrapping_add(FRAME_BUDGET);
            }
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.memory.joypad.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.memory.joypad.key_up(key);
    }

    pub fn loaded(&self) -> bool {
        self.memory.cartridge.loaded
    }

    pub fn title(&self) -> &str {
        &self.memory.cartridge.title
    }

    /// Read-only view of the 160x144 ARGB front buffer, row-major.
    pub fn framebuffer(&self) -> &[u32] {
        self.memory.ppu.framebuffer()
    }

    /// Number of completed frames (buffer swaps) so far.
    pub fn frames(&self) -> u64 {
        self.memory.ppu.frames()
    }

    /// Redraws and returns the VRAM tile-sheet view (128x192 ARGB),
    /// for debug overlays.
    pub fn tile_view(&mut self) -> &[u32] {
        self.memory.render_tile_view();
        self.memory.ppu.tile_view()
    }

    // --- Serial test interface (FF01/FF02); no link-cable peer exists, the
    // test harness scrapes bytes that ROMs push through these registers. ---

    pub fn serial_data_read(&self) -> u8 {
        self.memory.read_internal(SB_ADDR)
    }

    pub fn serial_data_write(&mut self, n: u8) {
        self.memory.write_internal(SB_ADDR, n);
    }

    pub fn serial_transfer_read(&self) -> bool {
        self.memory.read_internal(SC_ADDR) & 0x80 != 0
    }

    pub fn serial_transfer_write(&mut self, value: bool) {
        let low = self.memory.read_internal(SC_ADDR) & 0x01;
        self.memory
            .write_internal(SC_ADDR, ((value as u8) << 7) | low);
    }
}

impl Default for GameBoy {
    fn default() -> Self {
        GameBoy::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Writes a 32 KiB plain-ROM image whose entry point at 0x0100 holds
    /// `program`, padded with NOPs.
    fn temp_cart(name: &str, program: &[u8]) -> PathBuf {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0134..0x013A].copy_from_slice(b"TESTER");
        rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
        let path = std::env::temp_dir().join(name);
        fs::write(&path, &rom).unwrap();
        path
    }

    fn booted(name: &str, program: &[u8]) -> GameBoy {
        let path = temp_cart(name, program);
        let mut gb = GameBoy::new();
        gb.load(&path);
        fs::remove_file(&path).ok();
        gb.speed = true;
        gb
    }

    #[test]
    fn load_populates_title_and_starts_post_boot() {
        let gb = booted("facade_title.gb", &[0x00]);
        assert!(gb.loaded());
        assert_eq!(gb.title(), "TESTER");
        assert_eq!(gb.cpu.pc(), 0x0100);
        assert_eq!(gb.cpu.af(), 0x01B0);
    }

    #[test]
    fn frame_cadence_is_70224_cycles() {
        // One PPU frame: 154 scanlines of 456 T-cycles.
        const FRAME_T_CYCLES: u64 = 70224;
        // JP 0x0100: spin without touching any LCD register.
        let mut gb = booted("facade_cadence.gb", &[0xC3, 0x00, 0x01]);

        while gb.frames() < 1 {
            gb.tick();
        }
        let start = gb.cpu.total_cycles();
        while gb.frames() < 61 {
            gb.tick();
        }
        let elapsed = gb.cpu.total_cycles() - start;
        // 60 frames worth of T-cycles, up to one instruction of slack.
        assert!(elapsed >= 60 * FRAME_T_CYCLES - 16);
        assert!(elapsed <= 60 * FRAME_T_CYCLES + 16);
    }

    #[test]
    fn joypad_interrupt_dispatches_to_0x60() {
        // EI, then NOPs; IE enables only the joypad interrupt.
        let mut gb = booted("facade_joypad.gb", &[0xFB, 0x00, 0x00, 0x00]);
        gb.memory.write_internal(0xFFFF, 0x10);

        gb.tick(); // EI
        gb.key_down(Key::Start);
        gb.tick(); // IME still pending, one more instruction
        gb.tick(); // IME live: dispatch
        assert_eq!(gb.cpu.pc(), 0x0060);
    }

    #[test]
    fn serial_scrape_protocol() {
        // LD A,0x61; LDH (01),A; LD A,0x81; LDH (02),A; JR -2.
        let mut gb = booted(
            "facade_serial.gb",
            &[0x3E, 0x61, 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02, 0x18, 0xFE],
        );

        for _ in 0..8 {
            gb.tick();
        }
        assert!(gb.serial_transfer_read());
        assert_eq!(gb.serial_data_read(), 0x61);
        gb.serial_transfer_write(false);
        assert!(!gb.serial_transfer_read());
    }

    #[test]
    fn boot_rom_handoff() {
        // Boot program: LD A,1; LDH (0x50),A; then spin.
        let mut boot = vec![0u8; BOOT_ROM_SIZE];
        boot[..6].copy_from_slice(&[0x3E, 0x01, 0xE0, 0x50, 0x18, 0xFE]);
        let boot_path = std::env::temp_dir().join("facade_boot.bin");
        fs::write(&boot_path, &boot).unwrap();

        let cart_path = temp_cart("facade_boot_cart.gb", &[0x00]);
        let mut gb = GameBoy::new();
        gb.load_boot(&boot_path);
        gb.load(&cart_path);
        fs::remove_file(&boot_path).ok();
        fs::remove_file(&cart_path).ok();
        gb.speed = true;

        // Execution starts inside the boot ROM.
        assert_eq!(gb.cpu.pc(), 0x0000);
        assert_eq!(gb.memory.read_internal(0x0000), 0x3E);

        gb.tick();
        gb.tick(); // LDH (0x50),A flips the latch
        assert!(!gb.memory.boot_enabled());
        assert_eq!(gb.memory.read_internal(0x0000), 0x00); // cartridge byte
    }

    #[test]
    fn failed_load_leaves_machine_idle() {
        let mut gb = GameBoy::new();
        gb.load("/nonexistent/rom.gb");
        assert!(!gb.loaded());
        let pc = gb.cpu.pc();
        gb.tick();
        assert_eq!(gb.cpu.pc(), pc);
    }
}
