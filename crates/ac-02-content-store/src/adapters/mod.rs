//! # Adapters

pub mod memory;
pub mod pinata;

pub use memory::InMemoryContentStore;
pub use pinata::PinataContentStore;
