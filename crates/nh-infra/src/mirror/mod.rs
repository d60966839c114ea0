//! Local mirror store adapters.

mod file_store;
mod memory;

pub use file_store::FileMirrorStore;
pub use memory::InMemoryMirrorStore;
