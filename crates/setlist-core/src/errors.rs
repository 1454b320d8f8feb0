use thiserror::Error;

use crate::ports::RepoError;

/// Error genérico del núcleo.
///
/// "No encontrado" y "no es tuyo" no son errores: los servicios devuelven
/// `Ok(None)` / `Ok(false)` en esos casos.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Falta un argumento obligatorio en la llamada (p. ej. user id vacío).
  #[error("{0}")]
  InvalidArgument(String),

  /// La entidad no pasó la validación. Solo lleva el primer mensaje.
  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("repository error: {0}")]
  Repository(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub(crate) fn map_repo_error(err: RepoError) -> CoreError {
  CoreError::Repository(err.to_string())
}
