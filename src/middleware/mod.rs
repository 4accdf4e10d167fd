pub mod session;

pub use session::{extract_session_token, session_middleware, SESSION_COOKIE};
