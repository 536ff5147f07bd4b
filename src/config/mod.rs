pub mod load;
pub mod types;

pub use types::{
    DEFAULT_FILTER, DEFAULT_SEPARATOR, Direction, InputMode, NamingPolicy, SETTINGS_FILE_NAME,
    StitchRequest, UserSettings, find_illegal_name_char,
};
