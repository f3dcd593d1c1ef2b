//! Small cross-cutting helpers shared by the g-tree modules.

/// Builds an [`eyre::Report`] for a condition that should be structurally
/// impossible given the invariants this crate maintains (a corrupted index,
/// a location whose descriptor was never interned, and so on).
///
/// Kept distinct from ordinary `eyre!()` call sites so that "this is a bug,
/// not user error" conditions are visually distinguishable in logs and in
/// the source.
#[macro_export]
macro_rules! make_internal_report {
  ($($arg:tt)*) => {
    eyre::eyre!("Internal error (this is a bug, please report it): {}", format!($($arg)*))
  };
}
