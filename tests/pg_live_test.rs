//! End-to-end tests against a provisioned PostgreSQL with the CoffeeWild
//! procedures (`SP_PEDIDO_CREATE`, `SP_PEDIDO_UPDATE`, `SP_PAGO_CREATE`) and
//! the `VW_RESUMEN_PEDIDOS` view installed.
//!
//! Ignored by default. Run with:
//!
//! ```text
//! COFFEEWILD_TEST_DSN=localhost/coffeewild \
//! COFFEEWILD_TEST_USER=coffeewild COFFEEWILD_TEST_PASS=... \
//! cargo test -- --ignored
//! ```

use coffeewild::config::{Config, ESTADO_ENTREGADO};
use coffeewild::db::{PedidoOps, Session};

fn live_config() -> Option<Config> {
    let dsn = std::env::var("COFFEEWILD_TEST_DSN").ok()?;
    Some(Config {
        user: std::env::var("COFFEEWILD_TEST_USER").unwrap_or_else(|_| "coffeewild".to_string()),
        password: std::env::var("COFFEEWILD_TEST_PASS").unwrap_or_default(),
        dsn,
        ..Config::default_config()
    })
}

#[tokio::test]
#[ignore = "requires a provisioned database with the stored procedures installed"]
async fn ciclo_de_pedido_completo() {
    let Some(config) = live_config() else {
        eprintln!("COFFEEWILD_TEST_DSN no definido; prueba omitida");
        return;
    };

    let mut session = Session::connect(&config).await.expect("conexión");

    let pedido_id = session
        .crear_pedido(config.tipo_pedido)
        .await
        .expect("crear pedido");
    assert!(pedido_id > 0, "el ID generado debe ser positivo");

    session
        .actualizar_pedido(pedido_id, ESTADO_ENTREGADO)
        .await
        .expect("actualizar pedido");

    let pago_id = session.registrar_pago(pedido_id).await.expect("registrar pago");
    assert!(pago_id > 0, "el ID de pago debe ser positivo");

    let filas = session.resumen_pedidos().await.expect("resumen");
    assert!(!filas.is_empty(), "el resumen debe incluir el pedido creado");

    session.close().await.expect("cerrar sesión");
}

#[tokio::test]
#[ignore = "requires a reachable database server"]
async fn credenciales_invalidas_fallan_al_conectar() {
    let Some(mut config) = live_config() else {
        eprintln!("COFFEEWILD_TEST_DSN no definido; prueba omitida");
        return;
    };
    config.password = "definitivamente-incorrecta".to_string();

    let err = Session::connect(&config).await.unwrap_err();
    assert!(err.is_connection(), "debe ser un error de conexión: {err}");
}
