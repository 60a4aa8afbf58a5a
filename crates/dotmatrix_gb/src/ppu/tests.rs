use super::*;

fn setup() -> (Memory, Ppu) {
    let mut memory = Memory::new();
    memory.skip_boot();
    memory.write(io::BGP, 0xE4);
    memory.write(io::OBP0, 0xE4);
    memory.set_io_register(io::IF, 0);
    let ppu = Ppu::new(&mut memory);
    (memory, ppu)
}

fn run_lines(ppu: &mut Ppu, memory: &mut Memory, lines: usize) {
    for _ in 0..lines {
        ppu.sync(memory, LINE_CYCLES);
    }
}

fn run_frame(ppu: &mut Ppu, memory: &mut Memory) -> FrameBuffer {
    run_lines(ppu, memory, usize::from(VBLANK_LINE));
    ppu.get_frame().expect("frame after 144 lines")
}

/// Fill one tile with a constant colour number.
fn solid_tile(memory: &mut Memory, base: u16, color: u8) {
    let low = if color & 1 != 0 { 0xFF } else { 0x00 };
    let high = if color & 2 != 0 { 0xFF } else { 0x00 };
    for row in 0..8 {
        memory.write(base + row * 2, low);
        memory.write(base + row * 2 + 1, high);
    }
}

#[test]
fn mode_transitions_follow_cycle_thresholds() {
    let (mut memory, mut ppu) = setup();
    assert_eq!(ppu.mode(), PpuMode::Oam);

    ppu.sync(&mut memory, 19);
    assert_eq!(ppu.mode(), PpuMode::Oam);
    ppu.sync(&mut memory, 1);
    assert_eq!(ppu.mode(), PpuMode::Vram);
    assert_eq!(ppu.clock(), 0);

    ppu.sync(&mut memory, 43);
    assert_eq!(ppu.mode(), PpuMode::HBlank);
    assert_eq!(memory.io_register(io::STAT) & 0x03, PpuMode::HBlank as u8);

    ppu.sync(&mut memory, 51);
    assert_eq!(ppu.mode(), PpuMode::Oam);
    assert_eq!(ppu.line(), 1);
    assert_eq!(memory.read(io::LY), 1);
}

#[test]
fn stat_reports_oam_mode_right_after_creation() {
    let (memory, ppu) = setup();
    assert_eq!(ppu.mode(), PpuMode::Oam);
    assert_eq!(memory.io_register(io::STAT) & 0x03, PpuMode::Oam as u8);
    assert_eq!(memory.io_register(io::IF), 0);
}

#[test]
fn leftover_cycles_carry_across_several_modes() {
    let (mut memory, mut ppu) = setup();

    ppu.sync(&mut memory, LINE_CYCLES * 2 + 25);

    assert_eq!(ppu.line(), 2);
    assert_eq!(ppu.mode(), PpuMode::Vram);
    assert_eq!(ppu.clock(), 5);
}

#[test]
fn frame_cadence() {
    let (mut memory, mut ppu) = setup();

    run_lines(&mut ppu, &mut memory, 143);
    assert!(!ppu.frame_ready());
    run_lines(&mut ppu, &mut memory, 1);
    assert!(ppu.frame_ready());
    assert_eq!(ppu.mode(), PpuMode::VBlank);
    assert_eq!(ppu.line(), 144);
    assert_eq!(memory.io_register(io::IF) & 0x01, 0x01);

    run_lines(&mut ppu, &mut memory, 9);
    assert_eq!(ppu.line(), 153);
    assert!(ppu.frame_ready());

    run_lines(&mut ppu, &mut memory, 1);
    assert!(!ppu.frame_ready());
    assert_eq!(ppu.mode(), PpuMode::Oam);
    assert_eq!(ppu.line(), 0);
    assert_eq!(memory.read(io::LY), 0);
}

#[test]
fn get_frame_is_edge_triggered() {
    let (mut memory, mut ppu) = setup();
    assert!(ppu.get_frame().is_none());

    run_lines(&mut ppu, &mut memory, 144);
    assert!(ppu.get_frame().is_some());
    assert!(ppu.get_frame().is_none());

    run_lines(&mut ppu, &mut memory, 154);
    assert!(ppu.get_frame().is_some());
}

#[test]
fn tile_rows_decode_low_and_high_planes() {
    let (mut memory, mut ppu) = setup();
    memory.write(0x8010, 0x3C);
    memory.write(0x8011, 0x7E);
    ppu.sync(&mut memory, 0);

    assert_eq!(ppu.tiles().tile(1)[0], [0, 2, 3, 3, 3, 3, 2, 0]);
}

#[test]
fn incremental_updates_match_bulk_decode() {
    let (mut memory, mut ppu) = setup();

    let mut seed: u32 = 0x1234_5678;
    for addr in 0x8000u16..0x9800 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        memory.write(addr, (seed >> 16) as u8);
    }
    // Overwrite a few rows again, one byte at a time.
    memory.write(0x8801, 0xAA);
    memory.write(0x9000, 0x0F);
    ppu.sync(&mut memory, 0);

    let mut bulk = TileCache::default();
    bulk.build_tile_data(memory.vram());
    assert_eq!(ppu.tiles(), &bulk);
}

#[test]
fn tile_cache_built_from_existing_vram() {
    let mut memory = Memory::new();
    memory.write(0x8000, 0xFF);
    let ppu = Ppu::new(&mut memory);
    assert_eq!(ppu.tiles().tile(0)[0], [1; 8]);
}

#[test]
fn signed_tile_numbers_map_to_upper_block() {
    let signed = LcdControl::ENABLE;
    assert_eq!(signed.tile_index(0), 256);
    assert_eq!(signed.tile_index(127), 383);
    assert_eq!(signed.tile_index(128), 128);
    assert_eq!(signed.tile_index(255), 255);

    let unsigned = LcdControl::ENABLE | LcdControl::TILE_DATA;
    assert_eq!(unsigned.tile_index(0), 0);
    assert_eq!(unsigned.tile_index(200), 200);
}

#[test]
fn background_renders_through_palette_and_scroll() {
    let (mut memory, mut ppu) = setup();
    solid_tile(&mut memory, 0x8010, 3);
    memory.write(0x9800, 0x01);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.pixel(0, 0), [0x00, 0x00, 0x00]);
    assert_eq!(frame.pixel(7, 7), [0x00, 0x00, 0x00]);
    assert_eq!(frame.pixel(8, 0), [0xFF, 0xFF, 0xFF]);
    assert_eq!(frame.pixel(0, 8), [0xFF, 0xFF, 0xFF]);

    memory.write(io::SCX, 4);
    run_lines(&mut ppu, &mut memory, 10);
    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(3, 0), 3);
    assert_eq!(frame.shade(4, 0), 0);

    // Palette remap: colour 3 -> shade 1.
    memory.write(io::BGP, 0x64);
    run_lines(&mut ppu, &mut memory, 10);
    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.pixel(0, 0), [0xAA, 0xAA, 0xAA]);
}

#[test]
fn signed_tile_data_renders_from_0x9000() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::LCDC, 0x81);
    solid_tile(&mut memory, 0x9000, 2);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(100, 50), 2);
}

#[test]
fn background_disabled_renders_white_regardless_of_palette() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::BGP, 0xFF);
    memory.write(io::LCDC, 0x90);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(0, 0), 0);
    assert!(frame.as_bytes().iter().all(|&b| b == 0xFF));
}

#[test]
fn window_overlays_background() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::LCDC, 0xF1);
    solid_tile(&mut memory, 0x8010, 3);
    for i in 0..0x400 {
        memory.write(0x9C00 + i, 0x01);
    }
    memory.write(io::WY, 2);
    memory.write(io::WX, 87);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(100, 1), 0);
    assert_eq!(frame.shade(79, 2), 0);
    assert_eq!(frame.shade(80, 2), 3);
    assert_eq!(frame.shade(159, 143), 3);
}

#[test]
fn sprites_draw_over_background_with_transparency() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::LCDC, 0x93);
    // Tile 2: left half transparent, right half colour 1.
    for row in 0..8u16 {
        memory.write(0x8020 + row * 2, 0x0F);
        memory.write(0x8021 + row * 2, 0x00);
    }
    memory.write(0xFE00, 16 + 10);
    memory.write(0xFE01, 8 + 20);
    memory.write(0xFE02, 0x02);
    memory.write(0xFE03, 0x00);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(20, 10), 0);
    assert_eq!(frame.shade(24, 10), 1);
    assert_eq!(frame.shade(27, 17), 1);
    assert_eq!(frame.shade(28, 10), 0);
    assert_eq!(frame.shade(24, 18), 0);
}

#[test]
fn sprite_behind_background_only_shows_over_colour_zero() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::LCDC, 0x93);
    solid_tile(&mut memory, 0x8010, 3);
    solid_tile(&mut memory, 0x8020, 1);
    // BG tile (0,0) is solid, the rest is colour 0.
    memory.write(0x9800, 0x01);
    memory.write(0xFE00, 16);
    memory.write(0xFE01, 8 + 4);
    memory.write(0xFE02, 0x02);
    memory.write(0xFE03, 0x80);

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(5, 0), 3);
    assert_eq!(frame.shade(9, 0), 1);
}

#[test]
fn ten_sprites_per_line_limit() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::LCDC, 0x93);
    solid_tile(&mut memory, 0x8020, 3);
    for i in 0..11u16 {
        let entry = 0xFE00 + i * 4;
        memory.write(entry, 16);
        memory.write(entry + 1, 8 + (i as u8) * 10);
        memory.write(entry + 2, 0x02);
        memory.write(entry + 3, 0x00);
    }

    let frame = run_frame(&mut ppu, &mut memory);
    assert_eq!(frame.shade(90, 0), 3);
    assert_eq!(frame.shade(100, 0), 0);
}

#[test]
fn lyc_match_raises_stat_interrupt_once() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::STAT, LcdStatus::LYC_INT.bits());
    memory.write(io::LYC, 5);

    run_lines(&mut ppu, &mut memory, 4);
    assert_eq!(memory.io_register(io::IF) & 0x02, 0);

    run_lines(&mut ppu, &mut memory, 1);
    assert_eq!(memory.io_register(io::IF) & 0x02, 0x02);
    assert_ne!(memory.io_register(io::STAT) & 0x04, 0);

    // Still on the matching line: no second edge.
    memory.set_io_register(io::IF, 0);
    ppu.sync(&mut memory, OAM_CYCLES + VRAM_CYCLES);
    assert_eq!(memory.io_register(io::IF) & 0x02, 0);
}

#[test]
fn hblank_source_fires_each_line() {
    let (mut memory, mut ppu) = setup();
    memory.write(io::STAT, LcdStatus::HBLANK_INT.bits());

    ppu.sync(&mut memory, OAM_CYCLES + VRAM_CYCLES);
    assert_eq!(memory.io_register(io::IF) & 0x02, 0x02);

    memory.set_io_register(io::IF, 0);
    ppu.sync(&mut memory, LINE_CYCLES);
    assert_eq!(memory.io_register(io::IF) & 0x02, 0x02);
}

#[test]
fn lcd_off_renders_white_without_interrupts() {
    let (mut memory, mut ppu) = setup();
    solid_tile(&mut memory, 0x8000, 3);
    memory.write(io::LCDC, 0x11);

    let frame = run_frame(&mut ppu, &mut memory);
    assert!(frame.as_bytes().iter().all(|&b| b == 0xFF));
    assert_eq!(memory.io_register(io::IF) & 0x03, 0);
}
