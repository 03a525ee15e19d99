//! Test-ROM harness: drives the emulator and scrapes the serial port the
//! way Blargg's test ROMs report results. The ROMs are not redistributable,
//! so each test looks for its image under `roms/` and skips when absent.

use std::path::Path;
use std::time::{Duration, Instant};

use matcha::GameBoy;

/// Runs a ROM until its serial output contains a verdict or the wall-clock
/// budget runs out. Returns the captured byte stream as text.
fn run_serial_rom(path: &Path, budget: Duration) -> String {
    let mut gb = GameBoy::new();
    gb.load(path);
    assert!(gb.loaded(), "failed to load {}", path.display());
    gb.speed = true;

    let mut output = String::new();
    let deadline = Instant::now() + budget;
    while Instant::now() < deadline {
        for _ in 0..0x4000 {
            gb.tick();
            if gb.serial_transfer_read() {
                output.push(gb.serial_data_read() as char);
                gb.serial_transfer_write(false);
            }
        }
        if output.contains("Passed") || output.contains("Failed") {
            break;
        }
    }
    output
}

fn check_rom(name: &str) {
    let path = Path::new("roms").join(name);
    if !path.exists() {
        eprintln!("skipping: {} not present", path.display());
        return;
    }
    let output = run_serial_rom(&path, Duration::from_secs(30));
    assert!(
        output.contains("Passed") && !output.contains("Failed"),
        "{name} reported: {output}"
    );
}

#[test]
fn blargg_cpu_instrs() {
    check_rom("cpu_instrs.gb");
}

#[test]
fn blargg_instr_timing() {
    check_rom("instr_timing.gb");
}
