// src/processing/libvips/mod.rs

//! Native AVIF encoding via libvips-rs.
//!
//! Only compiled with the `libvips` feature. libvips loads the input with its
//! own decoders and saves through libheif with AV1 compression.
//!
//! - [`VipsRuntime`]: Keeps the libvips global state alive for the process.
//! - [`VipsTranscoder`]: [`AvifTranscoder`](crate::processing::AvifTranscoder) backed by `heifsave`.

mod runtime;
mod transcoder;

pub use runtime::VipsRuntime;
pub use transcoder::VipsTranscoder;
