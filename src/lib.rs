pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use app::commands::AdminApp;
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::storage::LocalStorage;
pub use config::{Overrides, Settings};
pub use core::{client::ApiClient, form::FormSession, transport::HttpTransport};
pub use domain::model::{Branch, Club, ClubDraft, ClubMemberCount, Envelope, Member, MemberDraft};
pub use utils::error::{AppError, Result};
