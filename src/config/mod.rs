pub mod campaign;
#[cfg(feature = "cli")]
pub mod cli;

pub use campaign::CampaignConfig;
#[cfg(feature = "cli")]
pub use cli::{Cli, Command, GlobalArgs};
