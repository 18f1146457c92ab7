pub mod api;
pub mod middleware;

pub use api::{ApiState, build_router};
pub use middleware::{REQUEST_ID_HEADER, RequestContext};
