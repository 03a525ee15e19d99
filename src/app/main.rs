//! SDL2 front-end: window, key mapping and texture blit. Everything
//! emulation-related happens behind the `GameBoy` facade.

use std::env;
use std::thread;
use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

use matcha::{GB_HEIGHT, GB_WIDTH, GameBoy, Key, TILE_VIEW_HEIGHT, TILE_VIEW_WIDTH};

const SCALE: u32 = 4;

fn keymap(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::Right => Some(Key::Right),
        Keycode::Left => Some(Key::Left),
        Keycode::Up => Some(Key::Up),
        Keycode::Down => Some(Key::Down),
        Keycode::Z => Some(Key::A),
        Keycode::X => Some(Key::B),
        Keycode::RShift => Some(Key::Select),
        Keycode::Return => Some(Key::Start),
        _ => None,
    }
}

pub fn main() -> Result<(), String> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <rom_path> [boot_rom_path]", args[0]);
        std::process::exit(1);
    }

    let mut gb = GameBoy::new();
    if let Some(boot_path) = args.get(2) {
        gb.load_boot(boot_path);
    }
    gb.load(&args[1]);
    if !gb.loaded() {
        eprintln!("Failed to load ROM: {}", args[1]);
        std::process::exit(1);
    }

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let window = video_subsystem
        .window(
            &format!("matcha - {}", gb.title()),
            GB_WIDTH as u32 * SCALE,
            GB_HEIGHT as u32 * SCALE,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(
            PixelFormatEnum::ARGB8888,
            GB_WIDTH as u32,
            GB_HEIGHT as u32,
        )
        .map_err(|e| e.to_string())?;
    let mut tile_texture = texture_creator
        .create_texture_streaming(
            PixelFormatEnum::ARGB8888,
            TILE_VIEW_WIDTH as u32,
            TILE_VIEW_HEIGHT as u32,
        )
        .map_err(|e| e.to_string())?;

    let mut event_pump = sdl_context.event_pump()?;
    let mut presented_frame = 0;
    let mut show_tiles = false;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                // Tab holds fast-forward.
                Event::KeyDown {
                    keycode: Some(Keycode::Tab),
                    ..
                } => gb.speed = true,
                Event::KeyUp {
                    keycode: Some(Keycode::Tab),
                    ..
                } => gb.speed = false,
                // V toggles the VRAM tile-sheet overlay.
                Event::KeyDown {
                    keycode: Some(Keycode::V),
                    repeat: false,
                    ..
                } => show_tiles = !show_tiles,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keymap(keycode) {
                        gb.key_down(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = keymap(keycode) {
                        gb.key_up(key);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..4096 {
            gb.tick();
        }

        if gb.frames() != presented_frame {
            presented_frame = gb.frames();
            let framebuffer = gb.framebuffer();
            texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for y in 0..GB_HEIGHT {
                    for x in 0..GB_WIDTH {
                        let pixel = framebuffer[y * GB_WIDTH + x].to_ne_bytes();
                        let offset = y * pitch + x * 4;
                        buffer[offset..offset + 4].copy_from_slice(&pixel);
                    }
                }
            })?;
            canvas.copy(&texture, None, None)?;
            if show_tiles {
                let tiles = gb.tile_view();
                tile_texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
                    for y in 0..TILE_VIEW_HEIGHT {
                        for x in 0..TILE_VIEW_WIDTH {
                            let pixel = tiles[y * TILE_VIEW_WIDTH + x].to_ne_bytes();
                            let offset = y * pitch + x * 4;
                            buffer[offset..offset + 4].copy_from_slice(&pixel);
                        }
                    }
                })?;
                let overlay = sdl2::rect::Rect::new(
                    (GB_WIDTH as u32 * SCALE - TILE_VIEW_WIDTH as u32) as i32,
                    0,
                    TILE_VIEW_WIDTH as u32,
                    TILE_VIEW_HEIGHT as u32,
                );
                canvas.copy(&tile_texture, None, overlay)?;
            }
            canvas.present();
        } else {
            // Budget exhausted for this frame slice; don't spin the core.
            thread::sleep(Duration::from_micros(500));
        }
    }

    Ok(())
}
