// Domain layer: endpoints, request/outcome models and the transport port.

pub mod endpoint;
pub mod model;
pub mod ports;
