pub const FORMAT_NAME: &str = "ART sprite";
pub const FILE_EXT: &str = "art";
pub const SIDECAR_EXT: &str = "ini";
pub const BITMAP_EXT: &str = "bmp";

/// On-disk size of [`crate::ArtHeader`].
pub const ART_HEADER_SIZE: usize = 132;
/// On-disk size of [`crate::FrameHeader`].
pub const FRAME_HEADER_SIZE: usize = 28;
pub const COLOR_SIZE: usize = 4;
pub const PALETTE_ENTRIES: usize = 256;
pub const PALETTE_TABLE_SIZE: usize = PALETTE_ENTRIES * COLOR_SIZE;

/// Palette slots in the header; each may or may not be followed by a table.
pub const MAX_PALETTES: usize = 4;
pub const RESERVED_BANKS: usize = 3;
pub const RESERVED_BANK_COLORS: usize = 8;

/// Animated containers store one frame set per facing direction.
pub const DIRECTIONS: usize = 8;

/// Longest run a single control byte can describe.
pub const MAX_RUN: u8 = 0x7F;
pub const LITERAL_FLAG: u8 = 0x80;

/// Upper bound on width * height accepted from a stream.
pub const MAX_FRAME_PIXELS: usize = 1 << 26;

/// Frame substituted when its bitmap is absent from the interchange set.
pub const PLACEHOLDER_SIZE: u32 = 6;

pub const BMP_MAGIC: [u8; 2] = *b"BM";
pub const BMP_FILE_HEADER_SIZE: usize = 14;
pub const BMP_INFO_HEADER_SIZE: usize = 40;
pub const BMP_PIXEL_OFFSET: usize = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE + PALETTE_TABLE_SIZE;
/// Reserved header words written into every exported bitmap.
pub const BMP_RESERVED1: u16 = 28020;
pub const BMP_RESERVED2: u16 = 115;
