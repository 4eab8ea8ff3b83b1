//! Error types for the CoffeeWild session.
//!
//! Defined with `thiserror`. Connection-class failures are fatal (the run
//! aborts before any database work); every other class is consumed by the
//! orchestrator, which reports it and decides whether dependent steps run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("fallo de conexión: {message}")]
    Connection { message: String, suggestion: String },

    #[error("{procedure}: {message}")]
    Procedure {
        procedure: String,
        message: String,
        /// e.g. "P0001" for raise_exception
        sql_state: Option<String>,
    },

    #[error("error de consulta: {message}")]
    Query {
        message: String,
        sql_state: Option<String>,
    },

    #[error("tiempo agotado: {operation} superó {elapsed_secs}s")]
    Timeout { operation: String, elapsed_secs: u64 },

    #[error("error de decodificación: {message}")]
    Decode { message: String },

    #[error("error interno: {message}")]
    Internal { message: String },
}

impl SessionError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a stored-procedure error with optional SQL state.
    pub fn procedure(
        procedure: impl Into<String>,
        message: impl Into<String>,
        sql_state: Option<String>,
    ) -> Self {
        Self::Procedure {
            procedure: procedure.into(),
            message: message.into(),
            sql_state,
        }
    }

    /// Create a query error with optional SQL state.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Attach a procedure name to a driver error raised while calling it.
    /// Connection-class failures keep their class.
    pub fn for_procedure(procedure: impl Into<String>, err: sqlx::Error) -> Self {
        match Self::from(err) {
            Self::Query { message, sql_state } => Self::Procedure {
                procedure: procedure.into(),
                message,
                sql_state,
            },
            other => other,
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Get the SQL state code, if the database reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Procedure { sql_state, .. } | Self::Query { sql_state, .. } => {
                sql_state.as_deref()
            }
            _ => None,
        }
    }

    /// Check if this is a connection-class (fatal) error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// Convert sqlx errors to SessionError.
impl From<sqlx::Error> for SessionError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => SessionError::connection(
                msg.to_string(),
                "Revise el formato del DSN y las credenciales",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                SessionError::query(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => {
                SessionError::query("No se devolvieron filas", None)
            }
            sqlx::Error::PoolTimedOut => SessionError::timeout("adquirir conexión", 30),
            sqlx::Error::PoolClosed => SessionError::connection(
                "La conexión está cerrada",
                "Vuelva a abrir la sesión",
            ),
            sqlx::Error::Io(io_err) => SessionError::connection(
                format!("Error de E/S: {io_err}"),
                "Verifique la red y que el servidor de base de datos esté activo",
            ),
            sqlx::Error::Tls(tls_err) => SessionError::connection(
                format!("Error de TLS: {tls_err}"),
                "Verifique la configuración TLS y los certificados",
            ),
            sqlx::Error::Protocol(msg) => SessionError::connection(
                format!("Error de protocolo: {msg}"),
                "Verifique la compatibilidad del servidor",
            ),
            sqlx::Error::TypeNotFound { type_name } => {
                SessionError::decode(format!("Tipo no encontrado: {type_name}"))
            }
            sqlx::Error::ColumnNotFound(col) => {
                SessionError::decode(format!("Columna no encontrada: {col}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => SessionError::decode(format!(
                "Índice de columna {index} fuera de rango (len: {len})"
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                SessionError::decode(format!("No se pudo decodificar la columna {index}: {source}"))
            }
            sqlx::Error::Decode(source) => {
                SessionError::decode(format!("Error de decodificación: {source}"))
            }
            sqlx::Error::WorkerCrashed => SessionError::internal("El worker de la base de datos falló"),
            _ => SessionError::internal(format!("Error de base de datos desconocido: {err}")),
        }
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_display() {
        let err = SessionError::connection("no hay ruta al host", "Revise la red");
        assert!(err.to_string().contains("fallo de conexión"));
    }

    #[test]
    fn test_procedure_display_names_procedure() {
        let err = SessionError::procedure("SP_PEDIDO_CREATE", "pedido inválido", None);
        assert!(err.to_string().contains("SP_PEDIDO_CREATE"));
    }

    #[test]
    fn test_suggestion_only_on_connection() {
        let err = SessionError::connection("falló", "Revise las credenciales");
        assert_eq!(err.suggestion(), Some("Revise las credenciales"));
        assert_eq!(SessionError::internal("x").suggestion(), None);
    }

    #[test]
    fn test_is_connection() {
        assert!(SessionError::connection("e", "s").is_connection());
        assert!(SessionError::timeout("conexión", 10).is_connection());
        assert!(!SessionError::query("e", None).is_connection());
        assert!(!SessionError::procedure("SP", "e", None).is_connection());
    }

    #[test]
    fn test_sql_state_accessor() {
        let err = SessionError::query("violación", Some("23505".to_string()));
        assert_eq!(err.sql_state(), Some("23505"));
        assert_eq!(SessionError::internal("x").sql_state(), None);
    }

    #[test]
    fn test_from_configuration_maps_to_connection() {
        let err = SessionError::from(sqlx::Error::Configuration("dsn malo".into()));
        assert_matches!(err, SessionError::Connection { .. });
    }

    #[test]
    fn test_from_row_not_found_maps_to_query() {
        let err = SessionError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, SessionError::Query { sql_state: None, .. });
    }

    #[test]
    fn test_from_protocol_maps_to_connection() {
        let err = SessionError::from(sqlx::Error::Protocol("paquete corrupto".to_string()));
        assert_matches!(err, SessionError::Connection { .. });
    }

    #[test]
    fn test_from_column_not_found_maps_to_decode() {
        let err = SessionError::from(sqlx::Error::ColumnNotFound("total".to_string()));
        assert_matches!(err, SessionError::Decode { .. });
    }

    #[test]
    fn test_for_procedure_tags_query_errors() {
        let err = SessionError::for_procedure("SP_PAGO_CREATE", sqlx::Error::RowNotFound);
        assert_matches!(err, SessionError::Procedure { ref procedure, .. } if procedure == "SP_PAGO_CREATE");
    }

    #[test]
    fn test_for_procedure_keeps_connection_class() {
        let err = SessionError::for_procedure(
            "SP_PAGO_CREATE",
            sqlx::Error::Configuration("x".into()),
        );
        assert!(err.is_connection());
    }
}
