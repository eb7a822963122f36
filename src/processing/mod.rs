//! Image discovery, the transcoder seam and the quality back-off loop.

mod compressor;
mod discovery;
mod ravif;
mod transcoder;
#[cfg(feature = "libvips")]
pub mod libvips;

pub use compressor::{compress_image, output_path_for};
pub use discovery::discover_images;
pub use ravif::RavifTranscoder;
pub use transcoder::AvifTranscoder;
