use clap::Parser;
use jsxed_store::DEFAULT_STORE_PATH;
use std::net::SocketAddr;
use std::path::PathBuf;

/// HTTP server for stored JSX components
#[derive(Parser, Debug, Clone)]
#[command(name = "jsxed-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "JSXED_ADDR", default_value = "127.0.0.1:3030")]
    pub addr: SocketAddr,

    /// JSON file holding stored components
    #[arg(long, env = "JSXED_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Keep components in memory instead of a file
    #[arg(long)]
    pub memory: bool,
}
