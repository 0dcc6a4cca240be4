use std::collections::BTreeMap ;
use std::io::Write ;
use itertools::Itertools ;

use crate::{ ContentSource, Descriptor, LogicalName, NativeFunction, NativeSource, Unit, Value };
use crate::loader::BoxError ;
use super::{ Resolution, Resolver };



/// Units compiled into the crate, labelled `builtin`.
///
/// Each content routine is wrapped once when the resolver is built, so looking
/// the same name up twice hands out equal descriptors.
pub struct BuiltinResolver {
	units: BTreeMap<String, NativeSource>,
}

impl BuiltinResolver {

	pub const LABEL: &'static str = "builtin" ;

	pub fn empty() -> Self { Self { units: BTreeMap::new() }}

	/// The standard set: `echo`, `true` and `false`.
	pub fn standard() -> Self {
		Self::empty()
			.with( "echo", populate_echo )
			.with( "true", | unit | populate_status( unit, "true", 0 ))
			.with( "false", | unit | populate_status( unit, "false", 1 ))
	}

	/// Adds a native unit under `name`, replacing any unit already there.
	#[must_use]
	pub fn with<F>( mut self, name: impl Into<String>, populate: F ) -> Self
	where F: Fn( &Unit ) -> Result<(), BoxError> + Send + Sync + 'static {
		self.units.insert( name.into(), NativeSource::new( populate ));
		self
	}

	/// Names this resolver recognises, sorted.
	pub fn names( &self ) -> impl Iterator<Item = &str> { self.units.keys().map( String::as_str ) }

}

impl Default for BuiltinResolver {
	fn default() -> Self { Self::standard() }
}

impl Resolver for BuiltinResolver {
	fn label( &self ) -> &str { Self::LABEL }
	fn find( &self, name: &LogicalName ) -> Resolution {
		Ok( self.units.get( name.as_str() ).map(| source |
			Descriptor::new( name.clone(), Self::LABEL, ContentSource::Native( source.clone() ))
		))
	}
}

impl std::fmt::Debug for BuiltinResolver {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "BuiltinResolver" ).field( "units", &self.units.keys().collect::<Vec<_>>() ).finish()
	}
}

fn populate_echo( unit: &Unit ) -> Result<(), BoxError> {
	unit.set( "__doc__", "Prints its arguments separated by spaces." );
	unit.set( "main", NativeFunction::with_args(| args | {
		writeln!( std::io::stdout().lock(), "{}", args.iter().join( " " ))?;
		Ok( Value::Int( 0 ))
	}));
	Ok(())
}

fn populate_status( unit: &Unit, name: &str, status: i64 ) -> Result<(), BoxError> {
	unit.set( "__doc__", format!( "Does nothing, {} exits with status {}.", name, status ));
	unit.set( "main", NativeFunction::no_args( move || Ok( Value::Int( status ))));
	Ok(())
}
