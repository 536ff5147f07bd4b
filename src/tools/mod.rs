mod atomic_writer;
mod extension_validator;
mod glob_filter;
mod path_validator;

pub use atomic_writer::{is_temp_file, write_atomically};
pub use extension_validator::{
    RECOGNIZED_EXTENSIONS, all_equal, extension_of, is_recognized, is_recognized_file,
};
pub use glob_filter::NameFilter;
pub use path_validator::{
    ensure_directory_exists, validate_directory_exists, validate_file_exists,
};
