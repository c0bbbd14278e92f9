// Domain layer: records, form drafts, field rules and ports. Nothing here talks to the network.

pub mod model;
pub mod ports;
pub mod rules;
