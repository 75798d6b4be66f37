pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use routes::{router, ProcessRequest};
pub use state::{AppState, SharedPipeline};
