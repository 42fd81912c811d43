pub mod filename_utils;
pub mod time_utils;
