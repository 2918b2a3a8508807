pub mod audit;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::ApiError;
pub use server::{build_router, ApiServer};
pub use state::ApiContext;

pub type Result<T> = std::result::Result<T, ApiError>;
