// Domain layer: entities, value objects and the ports the use cases depend on.

pub mod credentials;
pub mod model;
pub mod ports;
