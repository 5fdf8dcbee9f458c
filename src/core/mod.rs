pub mod handler;
pub mod receiver;
pub mod response;

pub use handler::{DATAPOINT_PATH, RequestHandler};
pub use receiver::{DatapointReceiver, LifecycleError};
