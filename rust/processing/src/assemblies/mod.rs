// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in assemblies.

mod ammo_can;
mod garage;
mod robot_base;

pub use ammo_can::{AdvancedAmmoCan, AmmoCan, AmmoCanParams, LatchParams};
pub use garage::CarGarage;
pub use robot_base::RobotHomeBase;

use crate::assembly::Assembly;

/// Every built-in assembly with default parameters
pub fn builtin() -> Vec<Box<dyn Assembly>> {
    vec![
        Box::new(AmmoCan::new()),
        Box::new(AdvancedAmmoCan::new()),
        Box::new(CarGarage::new()),
        Box::new(RobotHomeBase::new()),
    ]
}

/// Look up a built-in assembly by its export name
pub fn by_name(name: &str) -> Option<Box<dyn Assembly>> {
    builtin().into_iter().find(|a| a.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use printforge_core::GenerationConfig;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_builtin_names_are_unique() {
        let names: FxHashSet<String> = builtin().iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names.len(), 4);
        assert!(by_name("car_garage").is_some());
        assert!(by_name("spaceship").is_none());
    }

    #[test]
    fn test_builtin_dimensions_resolve() {
        let config = GenerationConfig::builtin();
        for assembly in builtin() {
            let dims = assembly.dimensions(&config).unwrap();
            let recipes = assembly.recipes(&dims).unwrap();
            assert!(!recipes.is_empty(), "{} has no parts", assembly.name());
        }
    }
}
