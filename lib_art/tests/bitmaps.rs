mod common;

use std::fs;

use common::{animated_sample, assert_same_frames, static_sample};
use lib_art::bitmap::bmp::BitmapError;
use lib_art::bitmap::sidecar::SidecarError;
use lib_art::{encode, ArtError, ArtFile, Frame};

#[test]
fn test_export_file_set() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("critter");
    static_sample().save_bitmaps(&base).unwrap();

    assert!(dir.path().join("critter.ini").is_file());
    assert!(dir.path().join("critter_0.bmp").is_file());
    assert!(dir.path().join("critter_1.bmp").is_file());
    assert!(!dir.path().join("critter_2.bmp").exists());

    let bmp = fs::read(dir.path().join("critter_1.bmp")).unwrap();
    assert_eq!(&bmp[0..2], b"BM");
    // 10 pixels per row pad to 12; 4 rows.
    assert_eq!(bmp.len(), 1078 + 12 * 4);
    // Color table is the first palette.
    assert_eq!(&bmp[54 + 4..54 + 8], &[0, 0, 255, 0]);
}

#[test]
fn test_static_interchange_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("critter");
    let art = static_sample();

    art.save_bitmaps(&base).unwrap();
    let loaded = ArtFile::load_bitmaps(dir.path().join("critter.ini")).unwrap();

    assert_eq!(loaded.palettes, art.palettes);
    assert_eq!(loaded.header.words, art.header.words);
    assert_eq!(loaded.header.reserved_banks, art.header.reserved_banks);
    assert_eq!(loaded.key_frame(), 1);
    assert_same_frames(&loaded, &art);

    // Packing the edited set gives the same container as writing it directly.
    assert_eq!(encode(&loaded).unwrap(), encode(&art).unwrap());
}

#[test]
fn test_animated_interchange_names() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("walk");
    let art = animated_sample(2);
    art.save_bitmaps(&base).unwrap();

    for name in ["walk_00.bmp", "walk_07.bmp", "walk_10.bmp", "walk_17.bmp"] {
        assert!(dir.path().join(name).is_file(), "{} missing", name);
    }
    let sidecar = fs::read_to_string(dir.path().join("walk.ini")).unwrap();
    assert!(sidecar.starts_with("frames: 16\r\n"));
    assert!(sidecar.contains("frame 1_7:\r\n"));

    let loaded = ArtFile::load_bitmaps(dir.path().join("walk.ini")).unwrap();
    assert!(loaded.is_animated());
    assert_eq!(loaded.header.frame_count, 2);
    assert_same_frames(&loaded, &art);
}

#[test]
fn test_missing_bitmap_becomes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("critter");
    let art = static_sample();
    art.save_bitmaps(&base).unwrap();
    fs::remove_file(dir.path().join("critter_1.bmp")).unwrap();

    let loaded = ArtFile::load_bitmaps(dir.path().join("critter.ini")).unwrap();
    let frame = loaded.frame(1).unwrap();
    assert_eq!((frame.width(), frame.height()), (6, 6));
    assert!(frame.pixels().iter().all(|&p| p == 0));
    assert_eq!(frame.center(), art.frames[1].center());
    assert_eq!(frame.offset(), art.frames[1].offset());

    // The other frame is untouched.
    assert_eq!(loaded.frame(0).unwrap().pixels(), art.frames[0].pixels());
}

#[test]
fn test_edited_bitmap_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("critter");
    static_sample().save_bitmaps(&base).unwrap();

    // Repaint the bottom-left pixel of the 3x2 frame.
    let path = dir.path().join("critter_0.bmp");
    let mut bmp = fs::read(&path).unwrap();
    bmp[1078] = 200;
    fs::write(&path, bmp).unwrap();

    let loaded = ArtFile::load_bitmaps(dir.path().join("critter.ini")).unwrap();
    assert_eq!(loaded.frame(0).unwrap().pixel(0, 0), 200);
}

#[test]
fn test_truecolor_bitmap_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("critter");
    static_sample().save_bitmaps(&base).unwrap();

    let path = dir.path().join("critter_0.bmp");
    let mut bmp = fs::read(&path).unwrap();
    bmp[28..30].copy_from_slice(&24u16.to_le_bytes());
    fs::write(&path, bmp).unwrap();

    assert!(matches!(
        ArtFile::load_bitmaps(dir.path().join("critter.ini")),
        Err(ArtError::UnsupportedBitmapLayout(
            BitmapError::UnsupportedBitDepth(24)
        ))
    ));
}

#[test]
fn test_missing_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.ini");
    assert!(matches!(
        ArtFile::load_bitmaps(&path),
        Err(ArtError::MissingSourceFile { .. })
    ));
}

#[test]
fn test_malformed_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ini");
    fs::write(&path, "frames: 1\r\nkey_frame: 0\r\npalettes: 0\r\nheader: \r\nZZ\r\n").unwrap();
    assert!(matches!(
        ArtFile::load_bitmaps(&path),
        Err(ArtError::MalformedSidecar(_))
    ));
}

#[test]
fn test_binary_sidecar_is_malformed_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.ini");
    fs::write(&path, [b'f', b'r', 0xFF, 0xFE, 0x00]).unwrap();
    assert!(matches!(
        ArtFile::load_bitmaps(&path),
        Err(ArtError::MalformedSidecar(SidecarError::NotText))
    ));
}

#[test]
fn test_empty_frames_survive_interchange() {
    let dir = tempfile::tempdir().unwrap();
    let mut art = static_sample();
    let mut empty = Frame::new(0, 0);
    empty.set_center(4, 4);
    art.frames.push(empty);
    art.frames.push(Frame::new(0, 5));

    art.save_bitmaps(dir.path().join("critter")).unwrap();
    let loaded = ArtFile::load_bitmaps(dir.path().join("critter.ini")).unwrap();
    assert_same_frames(&loaded, &art);
    assert_eq!(encode(&loaded).unwrap(), encode(&art).unwrap());
}

#[test]
fn test_art_to_bitmaps_to_art() {
    let dir = tempfile::tempdir().unwrap();
    let art_path = dir.path().join("critter.art");
    static_sample().save_art(&art_path).unwrap();

    let art = ArtFile::load_art(&art_path).unwrap();
    art.save_bitmaps(dir.path().join("critter")).unwrap();
    let packed = ArtFile::load_bitmaps(dir.path().join("critter.ini")).unwrap();
    let repacked_path = dir.path().join("critter_new.art");
    packed.save_art(&repacked_path).unwrap();

    assert_eq!(fs::read(&art_path).unwrap(), fs::read(&repacked_path).unwrap());
}
