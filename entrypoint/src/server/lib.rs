pub mod cache;
pub mod config;
pub mod errors;
pub mod logger;
pub mod password;
pub mod quotes;
pub mod routes;
pub mod service_layers;
pub mod state;
pub mod sync;

pub use routes::build_router;
pub use state::ServerState;
