// Domain layer: catalog records, request/estimate models and the ports the engine talks through.

pub mod catalog;
pub mod model;
pub mod ports;
