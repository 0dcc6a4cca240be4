//! Dynamic loading of code units by name.
//!
//! A symbolic reference to a unit of code is resolved to a concrete source,
//! loaded and executed exactly once per logical name, cached, and can be
//! re-executed on request. Resolution strategies are pluggable: custom
//! resolvers are consulted before the built-in ones, so the set of loadable
//! names is open-ended at runtime.
//!
//! # Core Concepts
//!
//! - [`LogicalName`]: The cache key of a unit. Plugins loaded from files get a
//! 	synthetic `__plugin__<stem>` name so they never collide with registered names.
//!
//! - [`Resolver`]: A strategy mapping a name to a [`Descriptor`] or declining with
//! 	`Ok( None )`. Resolvers are kept in a [`ResolverChain`]; the first match wins.
//!
//! - [`Descriptor`]: A resolved-but-not-loaded unit: its name, a provenance label,
//! 	and a [`ContentSource`] (a `.wat`/`.wasm` file or a native closure).
//!
//! - [`Unit`]: The loaded record. Created empty, populated with [`Value`] attributes
//! 	while its content runs, then left alone. Wasm units also own their instance.
//!
//! - [`Importer`]: Resolver chain, [`UnitCache`] and [`Loader`] behind one handle.
//! 	Enforces at most one load per name, even across threads.
//!
//! - [`ResolutionIntent`]: A parsed `run` target (`path:P`, `name:N`, or a bare
//! 	short name looked up in the plugin directory).
//!
//! - [`invoke()`]: Calls a unit's `main`, with or without the argument list
//! 	depending on its declared signature, and returns an integer status.
//!
//! # Wasm units
//!
//! A wasm unit is a core module. Its exported globals and functions become
//! attributes, then its `_init` export (if any) runs and may set further
//! attributes through the `unit` host imports; see [`loader::host`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc ;
//! use wasm_import::{
//! 	invoke, CachePolicy, Descriptor, FnResolver, Importer, InvokeError,
//! 	Loader, LogicalName, NativeSource,
//! };
//!
//! let importer = Importer::new( Loader::new( None ).unwrap(), CachePolicy::Eager );
//!
//! // A resolver recognising a single name, producing a unit with one data attribute.
//! let source = NativeSource::new(| unit | { unit.set( "VALUE", 123 ); Ok(() )});
//! importer.register_front( Arc::new( FnResolver::new( "synthetic", move | name: &LogicalName |
//! 	Ok(( name.as_str() == "synthetic" ).then(||
//! 		Descriptor::new( name.clone(), "synthetic", source.clone().into() )
//! 	))
//! )));
//!
//! let unit = importer.import( &"synthetic".into() ).unwrap();
//! assert_eq!( unit.get( "VALUE" ).and_then(| value | value.as_int() ), Some( 123 ));
//! assert!( Arc::ptr_eq( &unit, &importer.import( &"synthetic".into() ).unwrap() ));
//!
//! // There is no `main`, so the unit cannot be invoked.
//! assert!( matches!( invoke( &unit, &[] ), Err( InvokeError::MissingEntryPoint( _ ))));
//! ```

mod name ;
mod value ;
mod descriptor ;
mod unit ;
pub mod resolver ;
pub mod loader ;
pub mod cache ;
mod importer ;
mod target ;
mod listing ;
mod invoke ;
pub mod config ;
pub mod cli ;

pub use name::{ LogicalName, PLUGIN_PREFIX };
pub use value::{ Value, Callable, CallShape, NativeFunction, ExportedFunction };
pub use descriptor::{ Descriptor, ContentSource, NativeSource };
pub use unit::{ Unit, ENTRY_POINT };
pub use resolver::{ Resolver, Resolution, ResolutionError, ResolverChain, FnResolver, BuiltinResolver, SearchPathResolver };
pub use loader::{ Loader, LoadError, ExecutionError, BoxError };
pub use cache::{ UnitCache, CachePolicy };
pub use importer::{ Importer, ImportError, ReloadError };
pub use target::ResolutionIntent ;
pub use listing::{ PluginInfo, list_plugins };
pub use invoke::{ invoke, InvokeError };
pub use config::{ RunnerConfig, ConfigError };
