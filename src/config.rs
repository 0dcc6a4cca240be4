//! Runner configuration, read from a TOML file.
//!
//! ```toml
//! plugin_dir = "plugins"
//! extensions = [ "wat", "wasm" ]
//! private_prefix = "_"
//! search_path = [ ".", "lib" ]
//! cache_policy = "eager"      # or "on-success"
//! fuel = 1_000_000            # omit for unmetered execution
//! strict_reload = false
//! log_filter = "wasm_import=debug"
//! ```
//!
//! Every key is optional.

use std::path::{ Path, PathBuf };
use serde::Deserialize ;
use thiserror::Error ;

use crate::CachePolicy ;



/// File looked for in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "task-runner.toml" ;

#[derive( Error, Debug )]
pub enum ConfigError {
	#[error( "Failed to read config {}: {source}", .path.display() )]
	Io { path: PathBuf, source: std::io::Error },
	#[error( "Failed to parse config {}: {source}", .path.display() )]
	Parse { path: PathBuf, source: toml::de::Error },
}

impl ConfigError {
	pub fn kind( &self ) -> &'static str { "ConfigError" }
}

#[derive( Debug, Clone, PartialEq, Deserialize )]
#[serde( default, deny_unknown_fields )]
pub struct RunnerConfig {
	/// Convention directory for plugin targets and listings.
	pub plugin_dir: PathBuf,
	/// Recognised unit file extensions, in lookup order.
	pub extensions: Vec<String>,
	/// File names starting with this are left out of listings.
	pub private_prefix: String,
	/// Directories searched for registered names.
	pub search_path: Vec<PathBuf>,
	pub cache_policy: CachePolicy,
	/// Fuel granted to every content run and call. `None` disables metering.
	pub fuel: Option<u64>,
	/// Treat a failed reload as an error instead of a warning.
	pub strict_reload: bool,
	/// `tracing` filter directives, used when `RUST_LOG` is unset.
	pub log_filter: Option<String>,
}

impl Default for RunnerConfig {
	fn default() -> Self {
		Self {
			plugin_dir: PathBuf::from( "plugins" ),
			extensions: vec![ "wat".to_string(), "wasm".to_string() ],
			private_prefix: "_".to_string(),
			search_path: vec![ PathBuf::from( "." ) ],
			cache_policy: CachePolicy::default(),
			fuel: None,
			strict_reload: false,
			log_filter: None,
		}
	}
}

impl RunnerConfig {

	/// Reads the config at `path`.
	///
	/// # Errors
	/// Fails if the file cannot be read or is not a valid config.
	pub fn load( path: &Path ) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string( path )
			.map_err(| source | ConfigError::Io { path: path.to_path_buf(), source })?;
		toml::from_str( &content )
			.map_err(| source | ConfigError::Parse { path: path.to_path_buf(), source })
	}

	/// Reads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists,
	/// otherwise returns the defaults.
	///
	/// # Errors
	/// Fails if an explicit or discovered file cannot be read or parsed.
	pub fn discover( path: Option<&Path> ) -> Result<Self, ConfigError> {
		match path {
			Some( path ) => Self::load( path ),
			None if Path::new( DEFAULT_CONFIG_FILE ).is_file() => Self::load( Path::new( DEFAULT_CONFIG_FILE )),
			None => Ok( Self::default() ),
		}
	}

}
