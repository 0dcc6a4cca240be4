//! Resolution and loading through the cache.
//!
//! [`Importer`] is the registry object the rest of the crate passes around: it
//! owns the resolver chain, the unit cache and the loader, and enforces the
//! at-most-one-load rule per [`LogicalName`].

use std::path::PathBuf ;
use std::sync::{ Arc, PoisonError, RwLock };
use thiserror::Error ;
use tracing::{ debug, info, warn };

use crate::{ BuiltinResolver, CachePolicy, Descriptor, LogicalName, Resolver, ResolverChain, SearchPathResolver, Unit, UnitCache };
use crate::cache::{ LoadClaim, Lookup };
use crate::config::RunnerConfig ;
use crate::loader::{ ExecutionError, LoadError, Loader };
use crate::resolver::ResolutionError ;



/// Errors raised while importing a unit.
#[derive( Error, Debug )]
pub enum ImportError {
	/// Every resolver declined the name.
	#[error( "No unit named {0}" )] NotFound( LogicalName ),
	/// The unit was requested again while its own content was still loading.
	#[error( "Circular import of {0}" )] Circular( LogicalName ),
	#[error( transparent )] Resolution( #[from] ResolutionError ),
	/// The content could not be obtained; the cache is unchanged.
	#[error( "Failed to load {name}: {source}" )]
	Load { name: LogicalName, #[source] source: LoadError },
	/// The content failed while executing.
	#[error( "Failed to execute {name}: {source}" )]
	Execution { name: LogicalName, #[source] source: ExecutionError },
}

impl ImportError {

	pub fn kind( &self ) -> &'static str { match self {
		Self::NotFound( _ ) | Self::Circular( _ ) => "LoadError",
		Self::Resolution( err ) => err.kind(),
		Self::Load { source, .. } => source.kind(),
		Self::Execution { source, .. } => source.kind(),
	}}

	fn from_execution( name: LogicalName, source: ExecutionError ) -> Self {
		match source {
			ExecutionError::BudgetExhausted => Self::Load { name, source: LoadError::BudgetExhausted },
			source => Self::Execution { name, source },
		}
	}

}

/// A reload failed; the previously cached unit is still in place.
#[derive( Error, Debug )]
#[error( "Reload of {name} failed: {source}" )]
pub struct ReloadError {
	pub name: LogicalName,
	#[source] pub source: ImportError,
}

impl ReloadError {
	pub fn kind( &self ) -> &'static str { "ReloadError" }
}

/// Resolver chain, unit cache and loader behind one handle.
///
/// Safe to share between threads: the chain sits behind a lock and the cache
/// serialises loads per name.
pub struct Importer {
	chain: RwLock<ResolverChain>,
	cache: UnitCache,
	loader: Loader,
	policy: CachePolicy,
}

impl Importer {

	/// An importer with an empty resolver chain.
	pub fn new( loader: Loader, policy: CachePolicy ) -> Self {
		Self { chain: RwLock::new( ResolverChain::new() ), cache: UnitCache::new(), loader, policy }
	}

	/// An importer with the default chain `[builtin, search-path]` set up from `config`.
	///
	/// # Errors
	/// Returns [`LoadError::Engine`] if the wasm engine cannot be created.
	pub fn from_config( config: &RunnerConfig ) -> Result<Self, LoadError> {
		let importer = Self::new( Loader::new( config.fuel )?, config.cache_policy );
		importer.register_back( Arc::new( BuiltinResolver::standard() ));
		importer.register_back( Arc::new( SearchPathResolver::new(
			config.search_path.iter().cloned(),
			config.extensions.iter().cloned(),
		)));
		Ok( importer )
	}

	#[inline] pub fn cache( &self ) -> &UnitCache { &self.cache }
	#[inline] pub fn loader( &self ) -> &Loader { &self.loader }
	#[inline] pub fn policy( &self ) -> CachePolicy { self.policy }

	/// Registers a resolver ahead of all others.
	pub fn register_front( &self, resolver: Arc<dyn Resolver> ) {
		debug!( resolver = resolver.label(), "registering resolver at front" );
		self.chain.write().unwrap_or_else( PoisonError::into_inner ).push_front( resolver );
	}

	/// Registers a resolver behind all others.
	pub fn register_back( &self, resolver: Arc<dyn Resolver> ) {
		debug!( resolver = resolver.label(), "registering resolver at back" );
		self.chain.write().unwrap_or_else( PoisonError::into_inner ).push_back( resolver );
	}

	/// Labels of the resolver chain, in consultation order.
	pub fn resolvers( &self ) -> Vec<String> {
		self.chain.read().unwrap_or_else( PoisonError::into_inner ).labels()
	}

	/// Asks the resolver chain for `name`.
	///
	/// # Errors
	/// Returns [`ImportError::NotFound`] if every resolver declines, or the
	/// [`ResolutionError`] that aborted the chain.
	pub fn resolve( &self, name: &LogicalName ) -> Result<Descriptor, ImportError> {
		self.chain.read().unwrap_or_else( PoisonError::into_inner )
			.resolve( name )?
			.ok_or_else(|| ImportError::NotFound( name.clone() ))
	}

	/// Where `name` comes from: the cached unit's origin, or else the origin
	/// the resolver chain would give it. `None` if nothing can provide it.
	///
	/// # Errors
	/// Returns the [`ResolutionError`] that aborted the chain.
	pub fn find_origin( &self, name: &LogicalName ) -> Result<Option<String>, ResolutionError> {
		if let Some( origin ) = self.cache.origin( name ) { return Ok( Some( origin )) }
		Ok( self.chain.read().unwrap_or_else( PoisonError::into_inner )
			.resolve( name )?
			.map(| descriptor | descriptor.origin().to_string() ))
	}

	/// Returns the cached unit for `name`, resolving and loading it first if
	/// needed.
	///
	/// # Errors
	/// See [`ImportError`].
	pub fn import( &self, name: &LogicalName ) -> Result<Arc<Unit>, ImportError> {
		match self.cache.lookup( name ) {
			Lookup::Hit( unit ) => Ok( unit ),
			Lookup::Circular => Err( ImportError::Circular( name.clone() )),
			Lookup::Claimed( claim ) => {
				let descriptor = self.resolve( name )?;
				self.run( claim, descriptor )
			},
		}
	}

	/// Loads `descriptor`, returning the cached unit if one from the same
	/// source is already there.
	///
	/// A cached unit from a different source is replaced.
	///
	/// # Errors
	/// See [`ImportError`].
	pub fn load( &self, descriptor: Descriptor ) -> Result<Arc<Unit>, ImportError> {
		let name = descriptor.name().clone();
		match self.cache.lookup( &name ) {
			Lookup::Hit( unit ) if unit.descriptor().source() == descriptor.source() => Ok( unit ),
			Lookup::Hit( _ ) => {
				let claim = self.cache.claim( &name ).ok_or_else(|| ImportError::Circular( name.clone() ))?;
				match claim.previous() {
					Some( current ) if current.descriptor().source() == descriptor.source() => Ok( current ),
					current => {
						if let Some( current ) = current {
							warn!( name = %name, cached = current.origin(), replacement = descriptor.origin(), "name collision, replacing cached unit" );
						}
						self.run( claim, descriptor )
					},
				}
			},
			Lookup::Circular => Err( ImportError::Circular( name )),
			Lookup::Claimed( claim ) => self.run( claim, descriptor ),
		}
	}

	/// Loads a module file under `name`.
	///
	/// # Errors
	/// See [`ImportError`].
	pub fn load_file( &self, name: LogicalName, path: impl Into<PathBuf> ) -> Result<Arc<Unit>, ImportError> {
		self.load( Descriptor::file( name, path ))
	}

	/// Re-executes the content of `unit` against a fresh unit and swaps it
	/// into the cache.
	///
	/// The new unit is built off to the side; on failure the cache keeps
	/// whatever it held before. Under [`CachePolicy::Eager`] the content sees
	/// the new unit when it imports its own name.
	///
	/// # Errors
	/// Returns a [`ReloadError`] wrapping the failure of the new run.
	pub fn reload( &self, unit: &Unit ) -> Result<Arc<Unit>, ReloadError> {
		let name = unit.name().clone();
		let fail = | source | ReloadError { name: name.clone(), source };

		let claim = self.cache.claim( &name ).ok_or_else(|| fail( ImportError::Circular( name.clone() )))?;
		let prepared = self.loader.prepare( unit.descriptor().source() )
			.map_err(| source | fail( ImportError::Load { name: name.clone(), source }))?;

		let fresh = Arc::new( Unit::new( unit.descriptor().clone() ));
		if self.policy == CachePolicy::Eager { claim.publish( &fresh ); }
		self.loader.execute( prepared, &fresh )
			.map_err(| source | fail( ImportError::from_execution( name.clone(), source )))?;

		claim.commit( Arc::clone( &fresh ));
		info!( name = %name, origin = fresh.origin(), "reloaded unit" );
		Ok( fresh )
	}

	fn run( &self, claim: LoadClaim<'_>, descriptor: Descriptor ) -> Result<Arc<Unit>, ImportError> {

		let name = descriptor.name().clone();
		let prepared = self.loader.prepare( descriptor.source() )
			.map_err(| source | ImportError::Load { name: name.clone(), source })?;

		let unit = Arc::new( Unit::new( descriptor ));
		if self.policy == CachePolicy::Eager { claim.publish( &unit ); }

		match self.loader.execute( prepared, &unit ) {
			Ok(()) => {
				claim.commit( Arc::clone( &unit ));
				info!( name = %name, origin = unit.origin(), "loaded unit" );
				Ok( unit )
			},
			Err( ExecutionError::BudgetExhausted ) => {
				drop( claim );
				Err( ImportError::from_execution( name, ExecutionError::BudgetExhausted ))
			},
			Err( source ) => {
				match self.policy {
					CachePolicy::Eager => claim.keep_published(),
					CachePolicy::OnSuccess => drop( claim ),
				}
				warn!( name = %name, error = %source, "unit content failed" );
				Err( ImportError::from_execution( name, source ))
			},
		}

	}

}

impl std::fmt::Debug for Importer {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Importer" )
			.field( "resolvers", &self.resolvers() )
			.field( "cache", &self.cache )
			.field( "policy", &self.policy )
			.finish_non_exhaustive()
	}
}
