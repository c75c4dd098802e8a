pub mod aliases;
pub mod check;
pub mod headers;
pub mod ranges;

use mole_core::error::MoleError;
use mole_core::schema::{load_alias_config, AliasConfig};
use std::path::Path;

/// The alias config to run with: a custom file when given, else the built-in.
pub fn alias_config(path: Option<&Path>) -> Result<AliasConfig, MoleError> {
    match path {
        Some(p) => {
            log::info!("using alias config {}", p.display());
            load_alias_config(p)
        }
        None => AliasConfig::builtin(),
    }
}
