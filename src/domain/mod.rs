// Domain layer: delivery models, the store directory and the ports implemented by adapters.

pub mod model;
pub mod ports;
pub mod stores;
