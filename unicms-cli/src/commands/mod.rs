pub mod completion;
pub mod config;
pub mod path;
pub mod request;
pub mod session;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use client::{ApiClient, FileStorage, KeyValueStorage, MemoryStorage, SessionStore};
use shared::{
    Locale,
    config::{ClientConfig, ConfigOverrides},
};

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to the configuration file (YAML or JSON)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Base address of the CMS backend, e.g. http://localhost:8080
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Session storage file
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Keep the session in memory only; nothing is written to disk
    #[arg(long, global = true, conflicts_with = "storage")]
    pub ephemeral: bool,

    /// Ambient locale used when a path carries none
    #[arg(long, global = true)]
    pub locale: Option<Locale>,
}

impl GlobalArgs {
    pub fn load_config(&self) -> Result<ClientConfig> {
        let overrides = ConfigOverrides {
            api_base_url: self.api_base.clone(),
            storage_path: self.storage.clone(),
            locale: self.locale,
        };
        ClientConfig::load_config(self.config.clone(), overrides)
            .context("failed to load configuration")
    }

    /// Human-readable description of where the session lives.
    pub fn storage_location(&self, config: &ClientConfig) -> String {
        if self.ephemeral {
            "memory (ephemeral)".to_string()
        } else {
            config.resolved_storage_path().display().to_string()
        }
    }

    pub fn open_session(&self, config: &ClientConfig) -> Arc<SessionStore> {
        let storage: Arc<dyn KeyValueStorage> = if self.ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(FileStorage::new(config.resolved_storage_path()))
        };
        Arc::new(SessionStore::open(storage))
    }

    pub fn gateway(&self, config: &ClientConfig) -> Result<ApiClient> {
        ApiClient::new(config, self.open_session(config)).context("failed to build API client")
    }
}

/// Subcommands that talk to the backend or the stored session.
#[derive(Subcommand, Debug)]
pub enum BackendCommand {
    /// Sign in and persist the session
    Login(session::LoginArgs),

    /// Create an account and sign it in
    Register(session::RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Send an authenticated request to the CMS backend
    Request(request::RequestArgs),
}

pub async fn dispatch(
    global: &GlobalArgs,
    config: &ClientConfig,
    command: BackendCommand,
) -> Result<()> {
    match command {
        BackendCommand::Login(args) => session::login(global, config, args).await,
        BackendCommand::Register(args) => session::register(global, config, args).await,
        BackendCommand::Logout => session::logout(global, config),
        BackendCommand::Whoami => {
            session::whoami(global, config);
            Ok(())
        }
        BackendCommand::Request(args) => request::send(global, config, args).await,
    }
}
