pub mod raw;
pub mod summary;
pub mod window;
