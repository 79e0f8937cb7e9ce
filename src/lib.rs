pub mod cli;
pub mod config;
pub mod engine;
pub mod export;
pub mod global;
pub mod import;
pub mod lattice;

pub use config::Config;
pub use engine::Engine;
pub use export::lattice_to_table;
pub use import::{import_lattice, ImportError, ImportResult};
pub use lattice::{Lattice, WordNode};
