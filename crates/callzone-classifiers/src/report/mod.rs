pub mod plots;
pub mod sink;
pub mod summary;
