// Public handlers (/, /health) and the session-checked resource proxy (/api/*).
pub mod proxy;
pub mod root;

pub use root::{health, root};
