//! Transactional stored-procedure commands.
//!
//! Each mutating call runs in its own transaction and is committed before the
//! next operation is attempted - there is no multi-statement atomicity across
//! the order lifecycle. Generated identifiers come back from the procedure's
//! trailing out-parameter, surfaced here as plain return values.
//!
//! On a failed statement no explicit rollback is issued; the per-operation
//! transaction is dropped and the driver's drop semantics apply.

use crate::config::{ESTADO_CONFIRMADO, ESTADO_CREADO, METODO_TARJETA, monto_tarjeta};
use crate::db::rows::Fila;
use crate::db::session::Session;
use crate::error::{SessionError, SessionResult};
use chrono::Utc;
use futures_util::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Connection, Row};
use tracing::debug;

const SP_PEDIDO_CREATE: &str = "SP_PEDIDO_CREATE";
const SP_PEDIDO_UPDATE: &str = "SP_PEDIDO_UPDATE";
const SP_PAGO_CREATE: &str = "SP_PAGO_CREATE";
const VW_RESUMEN_PEDIDOS: &str = "VW_RESUMEN_PEDIDOS";

/// The seam between the fixed orchestration flow and the database.
///
/// `Session` implements this against the live server; tests drive the flow
/// with a scripted implementation instead.
#[allow(async_fn_in_trait)]
pub trait PedidoOps {
    /// Create an order with the given type code and initial status "CREADO".
    /// Returns the generated order id. Commits before returning.
    async fn crear_pedido(&mut self, tipo: i32) -> SessionResult<i64>;

    /// Set an existing order's status. Commits on success. Whether the id
    /// exists is enforced (or not) by the procedure, not checked here.
    async fn actualizar_pedido(&mut self, pedido_id: i64, estado: &str) -> SessionResult<()>;

    /// Register a confirmed card payment for the order at the fixed amount.
    /// Returns the generated payment id. Commits on success.
    async fn registrar_pago(&mut self, pedido_id: i64) -> SessionResult<i64>;

    /// Read every row of the order summary view, untyped and unaggregated.
    async fn resumen_pedidos(&mut self) -> SessionResult<Vec<Fila>>;
}

impl PedidoOps for Session {
    async fn crear_pedido(&mut self, tipo: i32) -> SessionResult<i64> {
        let creado_en = Utc::now();
        debug!(tipo, "Calling SP_PEDIDO_CREATE");

        let conn = self.conn();
        let mut tx = conn.begin().await?;
        let row = sqlx::query("CALL SP_PEDIDO_CREATE($1, $2, $3, NULL)")
            .bind(tipo)
            .bind(creado_en)
            .bind(ESTADO_CREADO)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| SessionError::for_procedure(SP_PEDIDO_CREATE, e))?;
        let pedido_id = decode_generated_id(&row, SP_PEDIDO_CREATE)?;
        tx.commit().await?;

        debug!(pedido_id, "Order created");
        Ok(pedido_id)
    }

    async fn actualizar_pedido(&mut self, pedido_id: i64, estado: &str) -> SessionResult<()> {
        debug!(pedido_id, estado, "Calling SP_PEDIDO_UPDATE");

        let conn = self.conn();
        let mut tx = conn.begin().await?;
        sqlx::query("CALL SP_PEDIDO_UPDATE($1, $2)")
            .bind(pedido_id)
            .bind(estado)
            .execute(&mut *tx)
            .await
            .map_err(|e| SessionError::for_procedure(SP_PEDIDO_UPDATE, e))?;
        tx.commit().await?;

        debug!(pedido_id, "Order updated");
        Ok(())
    }

    async fn registrar_pago(&mut self, pedido_id: i64) -> SessionResult<i64> {
        let pagado_en = Utc::now();
        debug!(pedido_id, "Calling SP_PAGO_CREATE");

        let conn = self.conn();
        let mut tx = conn.begin().await?;
        let row = sqlx::query("CALL SP_PAGO_CREATE($1, $2, $3, $4, $5, NULL)")
            .bind(pedido_id)
            .bind(METODO_TARJETA)
            .bind(monto_tarjeta())
            .bind(pagado_en)
            .bind(ESTADO_CONFIRMADO)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| SessionError::for_procedure(SP_PAGO_CREATE, e))?;
        let pago_id = decode_generated_id(&row, SP_PAGO_CREATE)?;
        tx.commit().await?;

        debug!(pago_id, "Payment registered");
        Ok(pago_id)
    }

    async fn resumen_pedidos(&mut self) -> SessionResult<Vec<Fila>> {
        debug!("Querying VW_RESUMEN_PEDIDOS");

        let mut rows = sqlx::query("SELECT * FROM VW_RESUMEN_PEDIDOS").fetch(self.conn());
        let mut filas = Vec::new();
        while let Some(row) = rows
            .try_next()
            .await
            .map_err(|e| SessionError::for_procedure(VW_RESUMEN_PEDIDOS, e))?
        {
            filas.push(Fila::from_row(&row));
        }

        debug!(filas = filas.len(), "Summary fetched");
        Ok(filas)
    }
}

/// Read the generated identifier from a procedure's out-parameter row.
/// The column type depends on the procedure's declaration, so integer widths
/// and NUMERIC are all accepted.
fn decode_generated_id(row: &PgRow, procedure: &str) -> SessionResult<i64> {
    if let Ok(id) = row.try_get::<i64, _>(0) {
        return Ok(id);
    }
    if let Ok(id) = row.try_get::<i32, _>(0) {
        return Ok(i64::from(id));
    }
    match row.try_get::<sqlx::types::BigDecimal, _>(0) {
        Ok(decimal) => bigdecimal::ToPrimitive::to_i64(&decimal).ok_or_else(|| {
            SessionError::decode(format!(
                "{procedure}: el ID generado no cabe en un entero: {decimal}"
            ))
        }),
        Err(e) => Err(SessionError::decode(format!(
            "{procedure}: no se pudo leer el ID generado: {e}"
        ))),
    }
}
