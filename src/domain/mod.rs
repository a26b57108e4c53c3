// Domain layer: character records and the ports the pipeline stages are wired through.

pub mod model;
pub mod ports;
