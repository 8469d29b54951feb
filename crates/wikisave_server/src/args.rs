use clap::Parser;
use std::path::PathBuf;

/// Save a single-page wiki back to disk over HTTP PUT
#[derive(Parser, Debug)]
#[command(name = "wikisave", version, about, long_about = None)]
pub struct Cli {
    /// Storage directory holding current.html, or the document file itself
    /// [default: current directory]
    pub storage: Option<PathBuf>,

    /// Host to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not write monthly backups
    #[arg(long)]
    pub no_backups: bool,
}
