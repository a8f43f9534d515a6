use fert_serve::{Config, ProxyState};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use log::{error, info, warn};
use std::convert::Infallible;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "fert-proxy",
    about = "Forwards leaf images to the hosted crop classification functions"
)]
struct CmdArgs {
    #[structopt(long, help = "Address to listen on (overrides PROXY_ADDR)")]
    listen: Option<SocketAddr>,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("could not install Ctrl+C handler: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CmdArgs::from_args();

    let mut config = Config::from_env()?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    let addr = config.listen_addr;

    let state = Arc::new(ProxyState::new(config));

    // Initialize the admin credential up front. Only development keeps
    // running without one.
    match state.credentials() {
        Ok(key) => info!("Using service account {}", key.client_email),
        Err(err) if state.config().mode.is_development() => {
            warn!("Continuing without admin credential: {}", err)
        }
        Err(err) => {
            error!("Admin credential initialization error: {}", err);
            return Err(err.into());
        }
    }

    let make_service = make_service_fn(move |_conn: &AddrStream| {
        let state = Arc::clone(&state);

        let service = service_fn(move |req| fert_serve::handle(req, state.clone()));

        async move { Ok::<_, Infallible>(service) }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);
    info!("Inference proxy listening on http://{}", addr);

    if let Err(e) = server.with_graceful_shutdown(shutdown_signal()).await {
        error!("server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
