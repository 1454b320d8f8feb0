use chrono::{DateTime, Utc};

/// Fuente de la hora actual.
///
/// Los servicios la reciben inyectada para que los tests fijen el tiempo.
pub trait Clock {
  fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

impl<T: Clock + ?Sized> Clock for &T {
  fn now(&self) -> DateTime<Utc> {
    (**self).now()
  }
}
