//! brusio-core: types shared between client and server (view models, content
//! rendering). No I/O or dependencies incompatible with WASM.

pub mod content;
pub mod models;

// Re-exports to keep paths short in the server crate
pub use content::ContentType;
pub use models::{MessageVM, UserVM};
