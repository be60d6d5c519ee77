//! Low-level scanning over markup bytes

pub mod cursor;

pub use cursor::Cursor;
