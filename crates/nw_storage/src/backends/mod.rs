pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;
