pub mod campaign;
pub mod fasta;
pub mod jobs;
pub mod rename;
pub mod replace;
pub mod runner;
pub mod scores;
pub mod separate;

pub use crate::domain::model::{FastaFile, FastaRecord, TaskReport};
pub use crate::domain::ports::{SequenceSource, Storage, Task};
pub use crate::utils::error::Result;
