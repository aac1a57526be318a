// File: services/timod_firebase_module/src/main.rs
use std::process::ExitCode;
use std::sync::Arc;
use timod_common::{log_error, logging};
use timod_config::load_settings;
use timod_firebase::{run, FirebaseClientBuilder, FirebaseModule};
use timod_proto::{read_pkgs, PkgWriter};
use tokio::sync::mpsc;
use tracing::{info, info_span, Instrument, Level};

/// Capacity of the inbound package queue
const PKG_QUEUE_SIZE: usize = 64;

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(serve());

    // the stdin reader sits in a blocking read until the host writes or
    // closes the pipe, so the runtime must not wait for it
    runtime.shutdown_background();
    code
}

async fn serve() -> ExitCode {
    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to load module settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let level = settings.log_level.parse::<Level>().unwrap_or(Level::INFO);
    logging::init_with_level(level);

    let module = FirebaseModule::new(Arc::new(FirebaseClientBuilder::new(&settings)));

    let (pkg_tx, pkg_rx) = mpsc::channel(PKG_QUEUE_SIZE);
    let (err_tx, err_rx) = mpsc::channel(1);
    tokio::spawn(read_pkgs(tokio::io::stdin(), pkg_tx, err_tx));
    let mut writer = PkgWriter::new(tokio::io::stdout());

    let span = info_span!("module", name = %settings.name);
    span.in_scope(|| info!("Module started"));

    tokio::select! {
        err = run(&module, pkg_rx, err_rx, &mut writer).instrument(span.clone()) => {
            // the host restarts modules that exit with an error
            log_error(&err, "Module stopped");
            ExitCode::FAILURE
        }
        _ = shutdown_signal() => {
            module.shutdown().instrument(span).await;
            ExitCode::SUCCESS
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                log_error("signal registration failed", "Cannot listen for shutdown signals");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM signal"),
            _ = sigint.recv() => info!("Received SIGINT signal"),
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C signal");
        }
    }
}
