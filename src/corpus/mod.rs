// file: src/corpus/mod.rs
// description: document corpus module exports
// reference: internal module structure

pub mod loader;

pub use loader::DocumentLoader;
