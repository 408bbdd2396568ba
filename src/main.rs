//! ndncopyfile - Main entry point
//!
//! Mirrors a remote NDN repo locally, then registers the local replica in the
//! object's remote manifest. The sync must succeed before the manifest is
//! touched: a replica that failed to copy must not be advertised.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use ndncopyfile::config::{RepoConfig, DEFAULT_REPO_ROOT};
use ndncopyfile::transfer::{HostKeyPolicy, RemoteSession};
use ndncopyfile::{registrar, sync, utils};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Remote host holding the authoritative repo
    remote: String,

    /// Identifier registered for the local replica
    localrepo: String,

    /// NDN name of the object whose manifest is updated
    ndnname: String,

    /// Repository root, identical on both hosts
    #[arg(long, value_name = "DIR", default_value = DEFAULT_REPO_ROOT)]
    repo_root: PathBuf,

    /// SSH user (defaults to the invoking user)
    #[arg(long)]
    user: Option<String>,

    /// Trust and record host keys missing from known_hosts
    #[arg(long)]
    accept_new_host_key: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            println!("Usage: ndncopyfile <remote host> <local repo> <ndn name>");
            std::process::exit(1);
        }
    };

    utils::logger::init(&args.log_level)?;
    tracing::info!(
        "Starting ndncopyfile v{} (remote: {})",
        env!("CARGO_PKG_VERSION"),
        args.remote
    );

    let config = RepoConfig::with_root(&args.repo_root);
    run(&args, &config)
}

fn run(args: &Args, config: &RepoConfig) -> Result<()> {
    sync::mirror_repo(&args.remote, config).context("repo sync failed; manifest left untouched")?;

    let user = args
        .user
        .clone()
        .unwrap_or_else(|| std::env::var("USER").unwrap_or_else(|_| "root".to_string()));
    let policy = if args.accept_new_host_key {
        HostKeyPolicy::AcceptNew
    } else {
        HostKeyPolicy::KnownHosts
    };

    let session = RemoteSession::connect(&args.remote, &user, policy)?;
    registrar::register_local_storage(&session, config, &args.localrepo, &args.ndnname)?;
    session.disconnect()?;
    Ok(())
}
