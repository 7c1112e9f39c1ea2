use crate::responses::error_to_response;
use crate::router::handle;
use crate::tesla::{ClientConfig, TeslaClient};
use astra::Server;
use log::{error, info};
use std::net::SocketAddr;

mod auth;
mod domain;
mod errors;
mod responses;
mod router;
mod templates;
mod tesla;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::init();

    let client = match TeslaClient::new(ClientConfig::from_env()) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let bind = std::env::var("TESLA_ORDERS_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid TESLA_ORDERS_BIND value {bind:?}: {e}");
            std::process::exit(1);
        }
    };
    info!("starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &client) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down cleanly");
}
