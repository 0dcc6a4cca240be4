use std::path::{ Path, PathBuf };
use tracing::trace ;

use crate::{ Descriptor, LogicalName };
use super::{ Resolution, ResolutionError, Resolver };



/// Looks for `<name>.<ext>` in a list of directories.
///
/// Directories are searched in order and, inside each, extensions in order; the
/// first existing file wins. Descriptors are labelled `file:<absolute path>`.
#[derive( Debug, Clone )]
pub struct SearchPathResolver {
	dirs: Vec<PathBuf>,
	extensions: Vec<String>,
}

impl SearchPathResolver {

	pub const LABEL: &'static str = "search-path" ;

	pub fn new<D, E>( dirs: D, extensions: E ) -> Self
	where
		D: IntoIterator, D::Item: Into<PathBuf>,
		E: IntoIterator, E::Item: Into<String>,
	{
		Self {
			dirs: dirs.into_iter().map( Into::into ).collect(),
			extensions: extensions.into_iter().map( Into::into ).collect(),
		}
	}

	fn locate( &self, name: &str ) -> Option<PathBuf> {
		self.dirs.iter()
			.flat_map(| dir | self.extensions.iter().map( move | ext | dir.join( format!( "{}.{}", name, ext ))))
			.inspect(| candidate | trace!( candidate = %candidate.display(), "probing" ))
			.find(| candidate | candidate.is_file() )
	}

}

impl Resolver for SearchPathResolver {

	fn label( &self ) -> &str { Self::LABEL }

	fn find( &self, name: &LogicalName ) -> Resolution {
		validate( name.as_str() )?;
		let Some( path ) = self.locate( name.as_str() ) else { return Ok( None )};
		let path = std::path::absolute( &path ).unwrap_or( path );
		Ok( Some( Descriptor::file( name.clone(), path )))
	}

}

/// A searchable name is a single path component.
fn validate( name: &str ) -> Result<(), ResolutionError> {
	let single_component = Path::new( name ).file_name().is_some_and(| file_name | file_name == name );
	if name.is_empty() || name == "." || name == ".." || name.contains([ '/', '\\' ]) || !single_component {
		return Err( ResolutionError::InvalidName( name.to_string() ));
	}
	Ok(())
}
