//! Cartridge image: header decode, ROM/RAM buffers and the installed MBC.

use std::fs;
use std::path::Path;

use crate::mbc::Mbc;

/// Size of one ROM image unit; files must be a positive multiple of this.
const ROM_UNIT: usize = 0x8000; // 32 KiB

#[derive(Debug, Clone)]
pub struct Cartridge {
    pub loaded: bool,
    pub title: String,
    rom: Vec<u8>,
    ram: Vec<u8>,
    mbc: Mbc,
}

impl Cartridge {
    pub fn new() -> Self {
        Cartridge {
            loaded: false,
            title: String::new(),
            rom: Vec::new(),
            ram: Vec::new(),
            mbc: Mbc::Rom,
        }
    }

    /// Loads a headered ROM image from disk, decodes the header and installs
    /// the matching bank controller. On any failure the cartridge is left
    /// unloaded with zeroed state; no partial loads.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) {
        *self = Cartridge::new();

        let path = path.as_ref();
        let rom = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("failed to read cartridge {}: {err}", path.display());
                return;
            }
        };
        if rom.is_empty() || rom.len() % ROM_UNIT != 0 {
            log::error!(
                "cartridge {} has invalid size {} (must be a positive multiple of 32 KiB)",
                path.display(),
                rom.len()
            );
            return;
        }

        self.title = rom[0x0134..0x0144]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        let cartridge_type = rom[0x0147];
        self.mbc = Mbc::from_header(cartridge_type);

        let ram_size = if matches!(self.mbc, Mbc::Mbc2 { .. }) {
            // MBC2 ships 512 half-bytes on the controller die, regardless of
            // the header's RAM size byte.
            512
        } else {
            match rom[0x0149] {
                0x00 => 0,
                0x01 => 0x800,
                0x02 => 0x2000,
                0x03 => 0x8000,
                0x04 => 0x20000,
                0x05 => 0x10000,
                n => {
                    log::warn!("unknown RAM size code {n:#04X}, assuming no RAM");
                    0
                }
            }
        };

        log::info!(
            "loaded \"{}\": {} KiB ROM, {} KiB RAM, type {:#04X}",
            self.title,
            rom.len() / 1024,
            ram_size / 1024,
            cartridge_type
        );

        self.rom = rom;
        self.ram = vec![0; ram_size];
        self.loaded = true;
    }

    pub fn read(&self, address: u16) -> u8 {
        self.mbc.read(&self.rom, &self.ram, address)
    }

    pub fn write(&mut self, address: u16, n: u8) {
        self.mbc.write(&mut self.ram, address, n);
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Cartridge::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_rom(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn image(title: &str, cartridge_type: u8, ram_code: u8) -> Vec<u8> {
        let mut rom = vec![0u8; ROM_UNIT];
        rom[0x0134..0x0134 + title.len()].copy_from_slice(title.as_bytes());
        rom[0x0147] = cartridge_type;
        rom[0x0149] = ram_code;
        rom
    }

    #[test]
    fn load_decodes_header() {
        let path = temp_rom("cart_header.gb", &image("HELLO", 0x00, 0x00));
        let mut cartridge = Cartridge::new();
        cartridge.load(&path);
        fs::remove_file(&path).ok();

        assert!(cartridge.loaded);
        assert_eq!(cartridge.title, "HELLO");
    }

    #[test]
    fn load_rejects_missing_file() {
        let mut cartridge = Cartridge::new();
        cartridge.load("/nonexistent/rom.gb");
        assert!(!cartridge.loaded);
        assert!(cartridge.title.is_empty());
    }

    #[test]
    fn load_rejects_unaligned_size() {
        let path = temp_rom("cart_unaligned.gb", &vec![0u8; ROM_UNIT + 1]);
        let mut cartridge = Cartridge::new();
        cartridge.load(&path);
        fs::remove_file(&path).ok();
        assert!(!cartridge.loaded);
    }

    #[test]
    fn ram_size_comes_from_header_table() {
        let path = temp_rom("cart_ram.gb", &image("RAMTEST", 0x02, 0x03));
        let mut cartridge = Cartridge::new();
        cartridge.load(&path);
        fs::remove_file(&path).ok();

        // 32 KiB of RAM, reachable once the MBC1 gate opens.
        cartridge.write(0x0000, 0x0A);
        cartridge.write(0xA000, 0x99);
        assert_eq!(cartridge.read(0xA000), 0x99);
    }

    #[test]
    fn unsupported_type_degrades_to_plain_rom() {
        let mut rom = image("ODD", 0x20, 0x00); // MBC6, out of scope
        rom[0x0000] = 0xAB;
        let path = temp_rom("cart_mbc6.gb", &rom);
        let mut cartridge = Cartridge::new();
        cartridge.load(&path);
        fs::remove_file(&path).ok();

        assert!(cartridge.loaded);
        assert_eq!(cartridge.read(0x0000), 0xAB);
    }
}
