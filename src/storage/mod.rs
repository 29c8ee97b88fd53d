mod memory;
mod repository;

pub use memory::*;
pub use repository::*;
