//! symgraph-core: Shared types, errors, and identity hashing for the symgraph
//! code knowledge graph.

pub mod config;
pub mod error;
pub mod ident;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
