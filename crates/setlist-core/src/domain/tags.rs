use std::collections::BTreeSet;

/// Separa un campo de etiquetas libre en piezas limpias.
///
/// Corta por comas, recorta espacios y descarta las piezas vacías
/// (comas dobles, comas finales, piezas de solo espacios).
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
  raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Une las etiquetas de varios campos en un conjunto ordenado y sin duplicados.
///
/// El orden es el de `String` (byte a byte, sensible a mayúsculas).
pub fn distinct_tags<I, S>(raw_fields: I) -> BTreeSet<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut tags = BTreeSet::new();
  for field in raw_fields {
    for tag in split_tags(field.as_ref()) {
      if !tags.contains(tag) {
        tags.insert(tag.to_string());
      }
    }
  }
  tags
}
