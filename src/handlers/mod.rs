pub mod docs;
pub mod health;
pub mod mcp;

pub use docs::{docs_handler, upload_handler};
pub use health::{health_handler, ready_handler};
pub use mcp::mcp_handler;
