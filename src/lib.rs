pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{Cli, Command};

pub use crate::adapters::{storage::LocalStorage, uniprot::UniProtClient};
pub use crate::config::CampaignConfig;
pub use crate::core::runner::TaskRunner;
pub use crate::domain::model::{FastaFile, FastaRecord, TaskReport};
pub use crate::domain::ports::{SequenceSource, Storage, Task};
pub use crate::utils::error::{FoldError, Result};
