//! Run entry points.
//!
//! - [`compress_directory`]: Compress every image in the input directory

mod compress;

pub use compress::*;
