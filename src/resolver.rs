//! Name resolution.
//!
//! A [`Resolver`] maps a [`LogicalName`] to a [`Descriptor`] it can service, or
//! declines. Declining is an ordinary value (`Ok( None )`), not an error, so the
//! [`ResolverChain`] can move on to the next strategy. Only a malformed request
//! ([`ResolutionError`]) stops the chain early.

use std::sync::Arc ;
use thiserror::Error ;
use tracing::trace ;

use crate::{ Descriptor, LogicalName };

mod builtin ;
mod search_path ;

pub use builtin::BuiltinResolver ;
pub use search_path::SearchPathResolver ;



/// Outcome of asking a resolver about a name.
///
/// - `Ok( Some( descriptor ))` - the resolver can load the name
/// - `Ok( None )` - no match, try the next resolver
/// - `Err( _ )` - the request is malformed, abort resolution
pub type Resolution = Result<Option<Descriptor>, ResolutionError> ;

/// Errors that abort resolution.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ResolutionError {
	/// The name cannot denote any unit.
	#[error( "Invalid Name: {0:?}" )] InvalidName( String ),
	/// A resolver rejected the request.
	#[error( "Resolver {resolver} failed for {name}: {reason}" )]
	Failed { resolver: String, name: LogicalName, reason: String },
}

impl ResolutionError {
	pub fn kind( &self ) -> &'static str { "ResolutionError" }
}

/// A strategy mapping names to loadable descriptors.
///
/// Implementations must be pure with respect to their own state: asking twice
/// about the same name without anything changing must give equal answers.
///
/// ```
/// use wasm_import::{ Descriptor, LogicalName, Resolution, Resolver };
///
/// struct Constant ;
///
/// impl Resolver for Constant {
/// 	fn label( &self ) -> &str { "constant" }
/// 	fn find( &self, name: &LogicalName ) -> Resolution {
/// 		Ok( match name.as_str() {
/// 			"answer" => Some( Descriptor::native( name.clone(), "constant", | unit | {
/// 				unit.set( "VALUE", 42 );
/// 				Ok(())
/// 			})),
/// 			_ => None,
/// 		})
/// 	}
/// }
/// ```
pub trait Resolver: Send + Sync {

	/// Identifies the resolver when the chain is listed.
	fn label( &self ) -> &str ;

	/// Returns a descriptor for `name`, `Ok( None )` if it does not recognise it.
	///
	/// # Errors
	/// Returns a [`ResolutionError`] if the request is malformed.
	fn find( &self, name: &LogicalName ) -> Resolution ;

}

/// Adapts a closure into a [`Resolver`].
pub struct FnResolver<F> {
	label: String,
	find: F,
}

impl<F> FnResolver<F>
where
	F: Fn( &LogicalName ) -> Resolution + Send + Sync,
{
	pub fn new( label: impl Into<String>, find: F ) -> Self {
		Self { label: label.into(), find }
	}
}

impl<F> Resolver for FnResolver<F>
where
	F: Fn( &LogicalName ) -> Resolution + Send + Sync,
{
	fn label( &self ) -> &str { &self.label }
	fn find( &self, name: &LogicalName ) -> Resolution { ( self.find )( name )}
}

/// An ordered sequence of resolvers, consulted front to back.
#[derive( Clone, Default )]
pub struct ResolverChain {
	resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolverChain {

	pub fn new() -> Self { Self::default() }

	/// Inserts a resolver ahead of every registered one, so it shadows them
	/// for the names it recognises.
	pub fn push_front( &mut self, resolver: Arc<dyn Resolver> ) {
		self.resolvers.insert( 0, resolver );
	}

	/// Appends a resolver, consulted after every registered one.
	pub fn push_back( &mut self, resolver: Arc<dyn Resolver> ) {
		self.resolvers.push( resolver );
	}

	/// Labels of the registered resolvers, in consultation order.
	pub fn labels( &self ) -> Vec<String> {
		self.resolvers.iter().map(| resolver | resolver.label().to_string() ).collect()
	}

	/// Asks each resolver in turn; the first match wins.
	///
	/// # Errors
	/// Returns the first [`ResolutionError`] raised, without consulting the
	/// remaining resolvers.
	pub fn resolve( &self, name: &LogicalName ) -> Resolution {
		for resolver in &self.resolvers {
			match resolver.find( name )? {
				Some( descriptor ) => {
					trace!( name = %name, resolver = resolver.label(), "resolved" );
					return Ok( Some( descriptor ));
				},
				None => trace!( name = %name, resolver = resolver.label(), "no match" ),
			}
		}
		Ok( None )
	}

}

impl std::fmt::Debug for ResolverChain {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_list().entries( self.labels() ).finish()
	}
}
