// Domain layer: FASTA models, task reports and the ports the adapters implement.

pub mod model;
pub mod ports;
