pub mod names;
pub mod tables;
pub mod types;

pub use names::*;
pub use tables::*;
pub use types::*;
