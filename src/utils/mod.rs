pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{OptimizerError, OptimizerResult, PathError, ValidationError};
pub use validation::{validate_config, validate_compression, validate_input_path};
pub use formats::{InputFormat, OUTPUT_EXTENSION, format_from_path};
pub use fs::{get_file_size, prepare_directories, run_directory_name};
