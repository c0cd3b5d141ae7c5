pub mod drive;
pub mod memory;
