pub mod color;
pub mod decoder;
pub mod encoder;
mod file;
pub mod format;
pub mod frame;

pub use decoder::decode;
pub use encoder::encode;
