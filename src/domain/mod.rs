// Domain layer: request/offer models and the provider port.

pub mod model;
pub mod ports;
