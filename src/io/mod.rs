// IO layer: report exporters and snapshot import.

pub mod export;
pub mod import;

pub use export::*;
pub use import::*;
