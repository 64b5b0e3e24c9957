#![allow(missing_docs)]
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{info, warn};

use userzip_server::{DEFAULT_ZIP_CODES, ServerConfig, run};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let AppArgs {
        host,
        port,
        client_id,
        client_secret,
    } = AppArgs::parse().context("parsing arguments")?;
    let addr = SocketAddr::from((host, port));
    let config = ServerConfig::new(client_id, client_secret).with_zip_codes(DEFAULT_ZIP_CODES);
    run(addr, config).await?;

    info!("Bye!");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    host: IpAddr,
    port: u16,
    client_id: String,
    client_secret: String,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let host = pargs
            .opt_value_from_str(["-h", "--host"])
            .context("parsing host argument")?;

        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;

        let client_id = pargs
            .opt_value_from_str("--client-id")
            .context("parsing client id argument")?;

        let client_secret = pargs
            .opt_value_from_str("--client-secret")
            .context("parsing client secret argument")?;

        let result = Self {
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: port.unwrap_or(8080),
            client_id: client_id.unwrap_or_else(|| "userzip".to_string()),
            client_secret: client_secret.unwrap_or_else(|| "userzip-secret".to_string()),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}
