//! Target strings accepted by `run`.
//!
//! | Target | Intent | Logical name | Label |
//! |--------|--------|--------------|-------|
//! | `path:P` | [`ResolutionIntent::ByExplicitPath`] | `__plugin__<stem of P>` | `file:<abs P>` |
//! | `name:N` | [`ResolutionIntent::ByRegisteredName`] | `N` | `name:N` |
//! | `T` | [`ResolutionIntent::ByConventionDir`] | `__plugin__T` | `plugin:<abs base/T.ext>` |
//!
//! Prefixes are matched literally and in that order; anything else is a short
//! name in the convention directory, so parsing never fails.

use std::path::{ Path, PathBuf };
use std::sync::Arc ;

use crate::{ ImportError, Importer, LogicalName, Unit };



pub const PATH_PREFIX: &str = "path:" ;
pub const NAME_PREFIX: &str = "name:" ;

/// What a target string asks for.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum ResolutionIntent {
	/// Import through the resolver chain.
	ByRegisteredName( LogicalName ),
	/// Load a specific file.
	ByExplicitPath( PathBuf ),
	/// Load `<base_dir>/<short_name>.<ext>`.
	ByConventionDir { base_dir: PathBuf, short_name: String },
}

impl ResolutionIntent {

	pub fn parse( target: &str, base_dir: impl Into<PathBuf> ) -> Self {
		if let Some( path ) = target.strip_prefix( PATH_PREFIX ) {
			Self::ByExplicitPath( PathBuf::from( path ))
		} else if let Some( name ) = target.strip_prefix( NAME_PREFIX ) {
			Self::ByRegisteredName( LogicalName::new( name ))
		} else {
			Self::ByConventionDir { base_dir: base_dir.into(), short_name: target.to_string() }
		}
	}

	/// The cache key the target loads under.
	pub fn logical_name( &self ) -> LogicalName {
		match self {
			Self::ByRegisteredName( name ) => name.clone(),
			Self::ByExplicitPath( path ) => LogicalName::plugin( &path.file_stem().unwrap_or_default().to_string_lossy() ),
			Self::ByConventionDir { short_name, .. } => LogicalName::plugin( short_name ),
		}
	}

	/// The file the target refers to, if it refers to one.
	///
	/// For convention-directory targets this is the first candidate over
	/// `extensions` that exists, or the first candidate if none does.
	pub fn file( &self, extensions: &[String] ) -> Option<PathBuf> {
		match self {
			Self::ByRegisteredName( _ ) => None,
			Self::ByExplicitPath( path ) => Some( path.clone() ),
			Self::ByConventionDir { base_dir, short_name } => {
				let candidates = extensions.iter()
					.map(| ext | base_dir.join( format!( "{}.{}", short_name, ext )))
					.collect::<Vec<_>>();
				candidates.iter().find(| path | path.is_file() ).or( candidates.first() ).cloned()
			},
		}
	}

	/// Loads the target, returning the unit and a label describing where it
	/// came from.
	///
	/// # Errors
	/// Propagates the [`ImportError`] of the import or file load.
	pub fn load( &self, importer: &Importer, extensions: &[String] ) -> Result<( Arc<Unit>, String ), ImportError> {
		match self {
			Self::ByRegisteredName( name ) => Ok(( importer.import( name )?, format!( "{}{}", NAME_PREFIX, name ))),
			Self::ByExplicitPath( _ ) | Self::ByConventionDir { .. } => {
				let name = self.logical_name();
				let path = self.file( extensions ).ok_or_else(|| ImportError::NotFound( name.clone() ))?;
				let path = absolute( &path );
				let unit = importer.load_file( name, path.clone() )?;
				let label = match self {
					Self::ByExplicitPath( _ ) => format!( "file:{}", path.display() ),
					_ => format!( "plugin:{}", path.display() ),
				};
				Ok(( unit, label ))
			},
		}
	}

}

fn absolute( path: &Path ) -> PathBuf {
	std::path::absolute( path ).unwrap_or_else(|_| path.to_path_buf() )
}
