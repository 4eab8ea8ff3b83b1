//! The fixed orchestration flow.
//!
//! Sequence: create order; if an id was obtained, update it and register its
//! payment; always run the summary report. Each step's outcome is printed to
//! stdout in Spanish (the functional output) and recorded in the returned
//! `FlowReport`; nothing is re-raised between steps.

use crate::config::{Config, ESTADO_ENTREGADO};
use crate::db::ops::PedidoOps;
use tracing::warn;

/// What actually happened during one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlowReport {
    /// Generated order id, if creation succeeded.
    pub pedido_id: Option<i64>,
    /// True if the status update committed.
    pub pedido_actualizado: bool,
    /// Generated payment id, if the payment committed.
    pub pago_id: Option<i64>,
    /// Number of summary rows printed, if the report query succeeded.
    pub filas_resumen: Option<usize>,
}

/// Run the fixed flow against the given operations.
///
/// Update and payment are skipped when creation yields no id; an update
/// failure does not skip the payment; the summary report always runs.
pub async fn ejecutar<O: PedidoOps>(ops: &mut O, config: &Config) -> FlowReport {
    let mut report = FlowReport::default();

    match ops.crear_pedido(config.tipo_pedido).await {
        Ok(pedido_id) => {
            println!("Pedido creado correctamente. Nuevo ID: {pedido_id}");
            report.pedido_id = Some(pedido_id);
        }
        Err(e) => {
            println!("Error al crear pedido: {e}");
            warn!(error = %e, "crear_pedido failed");
        }
    }

    if let Some(pedido_id) = report.pedido_id {
        match ops.actualizar_pedido(pedido_id, ESTADO_ENTREGADO).await {
            Ok(()) => {
                println!("Pedido actualizado correctamente.");
                report.pedido_actualizado = true;
            }
            Err(e) => {
                println!("Error al actualizar pedido: {e}");
                warn!(error = %e, pedido_id, "actualizar_pedido failed");
            }
        }

        match ops.registrar_pago(pedido_id).await {
            Ok(pago_id) => {
                println!("Pago registrado correctamente. Nuevo ID: {pago_id}");
                report.pago_id = Some(pago_id);
            }
            Err(e) => {
                println!("Error al registrar pago: {e}");
                warn!(error = %e, pedido_id, "registrar_pago failed");
            }
        }
    }

    println!("\nRESUMEN DE PEDIDOS");
    match ops.resumen_pedidos().await {
        Ok(filas) => {
            for fila in &filas {
                println!("{fila}");
            }
            report.filas_resumen = Some(filas.len());
        }
        Err(e) => {
            println!("Error al leer pedidos: {e}");
            warn!(error = %e, "resumen_pedidos failed");
        }
    }

    report
}
