//! Process-wide registry of unit types.
//!
//! Unit types register themselves at link time with [`register_unit!`]; the
//! runner looks them up by name without knowing them at build time.

use crate::discovery::{DiscoveryError, UnitType};

inventory::collect!(UnitType);

/// Register a [`TestUnit`](crate::TestUnit) type under
/// `module_path!()::Type`.
///
/// ```ignore
/// unitrun_core::register_unit!(ExampleTest);
/// ```
#[macro_export]
macro_rules! register_unit {
    ($unit:ty) => {
        #[allow(unsafe_code)]
        const _: () = {
            $crate::inventory::submit! {
                $crate::UnitType::of::<$unit>(concat!(module_path!(), "::", stringify!($unit)))
            }
        };
    };
}

/// All registered unit types, sorted by name.
#[must_use]
pub fn registered_units() -> Vec<UnitType> {
    let mut units: Vec<UnitType> = inventory::iter::<UnitType>.into_iter().copied().collect();
    units.sort_by_key(UnitType::name);
    units
}

/// Resolve a unit by exact name or by a unique `::`-separated suffix.
///
/// # Errors
/// Returns `DiscoveryError::UnknownUnit` when nothing matches and
/// `DiscoveryError::AmbiguousUnit` when several suffix matches exist.
pub fn resolve_unit(name: &str) -> Result<UnitType, DiscoveryError> {
    resolve_in(&registered_units(), name)
}

pub(crate) fn resolve_in(units: &[UnitType], name: &str) -> Result<UnitType, DiscoveryError> {
    if let Some(unit) = units.iter().find(|u| u.name() == name) {
        return Ok(*unit);
    }

    let suffix = format!("::{name}");
    let matches: Vec<&UnitType> = units.iter().filter(|u| u.name().ends_with(&suffix)).collect();
    match matches.as_slice() {
        [] => Err(DiscoveryError::UnknownUnit(name.to_string())),
        [unit] => Ok(**unit),
        many => Err(DiscoveryError::AmbiguousUnit {
            name: name.to_string(),
            candidates: many.iter().map(|u| u.name().to_string()).collect(),
        }),
    }
}
