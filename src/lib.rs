pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::http::ReqwestTransport;
pub use config::ServiceConfig;
pub use crate::core::{
    classifier::ResponseClassifier, dispatcher::Dispatcher, request_builder::RequestBuilder,
    service::ServiceClient,
};
pub use domain::endpoint::{Endpoint, EndpointKind};
pub use domain::model::Payload;
pub use utils::error::{ConfigError, Result, ServiceError, ServiceResult, TransportError};
