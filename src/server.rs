use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::vars::{self, Vars, VarsSnapshot};

/// Builds the debug `Router`: `/debug/vars` only.
pub fn create_router(vars: Arc<Vars>) -> Router {
    Router::new()
        .route("/debug/vars", get(get_vars))
        .with_state(vars)
}

// ─── GET /debug/vars ─────────────────────────────────────────────

async fn get_vars(State(vars): State<Arc<Vars>>) -> Json<VarsSnapshot> {
    Json(vars.snapshot())
}

/// Bind `addr` and serve `vars` in the background.
///
/// Binding happens before this returns, so a taken port is reported here
/// rather than from the task. Inside a Tokio runtime the server is a task on
/// that runtime; otherwise it gets a dedicated thread with its own
/// current-thread runtime.
pub fn try_serve(addr: SocketAddr, vars: Arc<Vars>) -> Result<SocketAddr> {
    let bind_err = |source: std::io::Error| Error::Bind { addr, source };

    let sock = std::net::TcpListener::bind(addr).map_err(bind_err)?;
    sock.set_nonblocking(true).map_err(bind_err)?;
    let local = sock.local_addr().map_err(bind_err)?;

    let app = create_router(vars);
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let listener = {
                let _guard = handle.enter();
                tokio::net::TcpListener::from_std(sock).map_err(bind_err)?
            };
            handle.spawn(run(listener, app));
        }
        Err(_) => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(bind_err)?;
            let listener = {
                let _guard = rt.enter();
                tokio::net::TcpListener::from_std(sock).map_err(bind_err)?
            };
            std::thread::Builder::new()
                .name("debug-vars".into())
                .spawn(move || rt.block_on(run(listener, app)))
                .map_err(bind_err)?;
        }
    }
    Ok(local)
}

async fn run(listener: tokio::net::TcpListener, app: Router) {
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "debug listener exited");
    }
}

/// Serve the global vars on `localhost:<port>`. Exits the process if the
/// port cannot be bound.
pub fn serve(port: u16) {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    match try_serve(addr, vars::global().clone()) {
        Ok(local) => {
            info!("HTTP metrics now available at localhost:{}/debug/vars", local.port());
        }
        Err(e) => {
            error!(error = %e, "cannot start debug listener");
            std::process::exit(1);
        }
    }
}
