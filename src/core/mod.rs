pub mod classifier;
pub mod dispatcher;
pub mod request_builder;
pub mod service;

pub use crate::domain::endpoint::{Endpoint, EndpointDescriptor, EndpointKind, HttpMethod};
pub use crate::domain::model::{HttpRequest, Outcome, Payload};
pub use crate::domain::ports::Transport;
pub use crate::utils::error::{Result, ServiceResult};
