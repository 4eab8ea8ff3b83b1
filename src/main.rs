//! CoffeeWild session CLI - main entry point.
//!
//! Opens one database session, drives an order through create / deliver / pay
//! via stored procedures (each mutation committed on its own), prints the
//! summary view and closes the session.

use clap::Parser;
use coffeewild::config::Config;
use coffeewild::db::Session;
use coffeewild::flow;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Diagnostics go to stderr; stdout carries only the flow's own output.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() {
    let config = Config::parse();
    init_tracing(&config);

    println!("=== CoffeeWild - Test CRUD ===");

    // Connection acquisition is the only fatal failure: abort before any work.
    let mut session = match Session::connect(&config).await {
        Ok(session) => {
            println!("Conexión exitosa a CoffeeWild");
            session
        }
        Err(e) => {
            println!("Error al conectar: {e}");
            error!(error = %e, "Connection failed, aborting");
            std::process::exit(1);
        }
    };

    let report = flow::ejecutar(&mut session, &config).await;
    info!(
        pedido_id = ?report.pedido_id,
        actualizado = report.pedido_actualizado,
        pago_id = ?report.pago_id,
        filas_resumen = ?report.filas_resumen,
        "Flow finished"
    );

    // Intermediate failures never change the exit status; only report them.
    match session.close().await {
        Ok(()) => println!("\nConexión cerrada correctamente."),
        Err(e) => println!("Error al cerrar la conexión: {e}"),
    }
}
