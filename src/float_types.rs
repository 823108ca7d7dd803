// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Coplanarity tolerance used when nothing else is configured.
///
/// Too small and near-coincident surfaces crack apart numerically; too large
/// and thin features are eroded.
pub const DEFAULT_TOLERANCE: Real = 1e-5;

/// Lazily-initialized process-wide tolerance.
/// Defaults to [`DEFAULT_TOLERANCE`], but can be overridden:
///  1) **Build-time**: set env var `CSGBSP_TOLERANCE` (e.g. `CSGBSP_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
///
/// The engine itself never reads this directly; it only seeds
/// [`CsgOptions::default`](crate::boolean::CsgOptions).
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current process-wide tolerance.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("CSGBSP_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                if value.is_finite() {
                    return value.max(Real::EPSILON);
                }
            }
        }
        DEFAULT_TOLERANCE
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Returns `false` when a value had already been fixed or `value` is not finite.
///
/// Call near program start: `csgbsp::float_types::set_tolerance(1e-6);`
pub fn set_tolerance(value: Real) -> bool {
    value.is_finite() && TOLERANCE_CELL.set(value.max(Real::EPSILON)).is_ok()
}

/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;
