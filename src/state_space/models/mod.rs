//! Model implementations backed by the Kalman recursions in `core`.
pub mod local_level;

pub use self::local_level::LocalLevelModel;
