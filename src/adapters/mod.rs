// Adapters layer: concrete implementations for external systems (http transport, device metadata).

pub mod device;
pub mod http;
