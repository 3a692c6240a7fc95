pub mod config;
pub mod edge;
pub mod handlers;
pub mod request_parser;
pub mod router;
pub mod state;

pub use self::config::{Environment, ServerMode, Settings};
pub use edge::create_edge_service;
pub use request_parser::RequestBodyParser;
pub use router::create_router;
pub use state::AppState;
