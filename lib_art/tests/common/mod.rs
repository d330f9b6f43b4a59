#![allow(dead_code)]

use lib_art::{ArtFile, ArtHeader, Color, Frame, PaletteTable};

/// Fills a frame's grid from `fill(index)`, bottom row first.
pub fn frame_with(width: u32, height: u32, fill: impl Fn(usize) -> u8) -> Frame {
    let mut frame = Frame::new(width, height);
    for (i, p) in frame.pixels_mut().iter_mut().enumerate() {
        *p = fill(i);
    }
    frame
}

pub fn sample_palette() -> PaletteTable {
    let mut table = PaletteTable::grayscale();
    table.colors_mut()[1] = Color::new(0, 0, 255, 0);
    table.colors_mut()[2] = Color::new(0, 255, 0, 0);
    table.colors_mut()[255] = Color::new(12, 34, 56, 78);
    table
}

/// Static container: one palette, a noisy 3x2 frame and a mostly flat 10x4 one.
pub fn static_sample() -> ArtFile {
    let mut header = ArtHeader::default();
    header.words = [0x0000_0001, 0x1234_5678, 0xFFFF_FFFF];
    header.palette_markers[0] = Color::new(0, 0, 0, 0x80);
    header.reserved_banks[0][0] = Color::new(1, 2, 3, 4);
    header.frame_count_low = 1;

    let mut art = ArtFile::new(header);
    art.palettes.push(sample_palette());

    let mut noisy = frame_with(3, 2, |i| (i * 41 % 7) as u8);
    noisy.set_center(1, 2);
    noisy.set_offset(-5, 6);

    let mut flat = frame_with(10, 4, |i| if i % 10 == 9 { 2 } else { 1 });
    flat.set_center(-7, 0);
    flat.set_offset(0, 3);

    art.frames.push(noisy);
    art.frames.push(flat);
    art
}

/// Animated container without palettes and `groups` sets of 8 directions.
pub fn animated_sample(groups: usize) -> ArtFile {
    let mut art = ArtFile::new(ArtHeader::default());
    for i in 0..groups * 8 {
        let mut frame = frame_with(2 + i as u32 % 3, 2, |p| (p + i) as u8);
        frame.set_center(i as i32, -(i as i32));
        art.frames.push(frame);
    }
    art
}

/// Compares everything a round trip must keep; the stored payload size is
/// recomputed on every write and is left out.
pub fn assert_same_frames(actual: &ArtFile, expected: &ArtFile) {
    assert_eq!(actual.frames.len(), expected.frames.len());
    for (a, e) in actual.frames.iter().zip(&expected.frames) {
        assert_eq!((a.width(), a.height()), (e.width(), e.height()));
        assert_eq!(a.center(), e.center());
        assert_eq!(a.offset(), e.offset());
        assert_eq!(a.pixels(), e.pixels());
    }
}
