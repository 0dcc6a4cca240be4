//! Resolved-but-not-yet-loaded references to unit content.
//!
//! A [`Descriptor`] names the unit it will produce, carries a human readable
//! origin label, and says where the executable content comes from: a file on
//! disk holding a wasm module, or a native closure that populates the unit
//! directly.

use std::path::{ Path, PathBuf };
use std::sync::Arc ;

use crate::{ LogicalName, Unit };
use crate::loader::BoxError ;



type NativeFn = dyn Fn( &Unit ) -> Result<(), BoxError> + Send + Sync ;

/// Native content: a routine that writes attributes into an empty unit.
///
/// Sources compare by identity, so resolvers should hand out clones of one
/// `NativeSource` rather than wrapping the closure anew on every lookup.
#[derive( Clone )]
pub struct NativeSource( Arc<NativeFn> );

impl NativeSource {

	pub fn new<F>( populate: F ) -> Self
	where F: Fn( &Unit ) -> Result<(), BoxError> + Send + Sync + 'static {
		Self( Arc::new( populate ))
	}

	pub(crate) fn run( &self, unit: &Unit ) -> Result<(), BoxError> { ( self.0 )( unit )}

}

impl PartialEq for NativeSource {
	fn eq( &self, other: &Self ) -> bool { Arc::ptr_eq( &self.0, &other.0 )}
}
impl Eq for NativeSource {}

impl std::fmt::Debug for NativeSource {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( "NativeSource(<closure>)" )}
}

/// Where the content of a unit is obtained from.
#[derive( Clone, Debug, PartialEq, Eq )]
pub enum ContentSource {
	/// A `.wat` or `.wasm` file.
	File( PathBuf ),
	/// A routine run against the unit in-process.
	Native( NativeSource ),
}

impl ContentSource {
	/// The file backing this source, if any.
	pub fn path( &self ) -> Option<&Path> { match self {
		Self::File( path ) => Some( path ),
		Self::Native( _ ) => None,
	}}
}

impl From<NativeSource> for ContentSource {
	fn from( source: NativeSource ) -> Self { Self::Native( source )}
}

impl From<PathBuf> for ContentSource {
	fn from( path: PathBuf ) -> Self { Self::File( path )}
}

/// The result of resolution, consumed by the loader.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct Descriptor {
	name: LogicalName,
	origin: String,
	source: ContentSource,
}

impl Descriptor {

	pub fn new( name: LogicalName, origin: impl Into<String>, source: ContentSource ) -> Self {
		Self { name, origin: origin.into(), source }
	}

	/// A descriptor for a module file, labelled `file:<path>`.
	pub fn file( name: LogicalName, path: impl Into<PathBuf> ) -> Self {
		let path = path.into();
		Self { name, origin: format!( "file:{}", path.display() ), source: ContentSource::File( path )}
	}

	/// A descriptor for native content.
	pub fn native<F>( name: LogicalName, origin: impl Into<String>, populate: F ) -> Self
	where F: Fn( &Unit ) -> Result<(), BoxError> + Send + Sync + 'static {
		Self { name, origin: origin.into(), source: ContentSource::Native( NativeSource::new( populate ))}
	}

	#[inline] pub fn name( &self ) -> &LogicalName { &self.name }
	#[inline] pub fn origin( &self ) -> &str { &self.origin }
	#[inline] pub fn source( &self ) -> &ContentSource { &self.source }

}
