/// Entidad que pertenece a un usuario.
///
/// Toda exportación o mutación consulta este predicado antes de tocar la
/// lógica de negocio; un registro ajeno se trata igual que uno inexistente.
pub trait Owned {
  fn owner_id(&self) -> &str;

  fn is_owned_by(&self, user_id: &str) -> bool {
    !user_id.is_empty() && self.owner_id() == user_id
  }
}

/// Descarta la entidad si no pertenece a `user_id`.
pub fn owned_by<T: Owned>(entity: Option<T>, user_id: &str) -> Option<T> {
  entity.filter(|e| e.is_owned_by(user_id))
}
