// Domain layer: core models and ports (interfaces). No browser or OS crates here.

pub mod model;
pub mod ports;
