pub mod loader;
pub mod sample;

pub use loader::{DataError, DataLoader};
