//! Turning descriptors into populated units.
//!
//! Loading happens in two steps. [`Loader::prepare`] obtains the content: it
//! reads and compiles a module file, or picks up a native routine. Nothing has
//! been allocated at that point, so a [`LoadError`] leaves every cache untouched.
//! [`Loader::execute`] then runs the prepared content against an empty
//! [`Unit`], binding what it produces as attributes. Failures there are
//! [`ExecutionError`]s and may leave the unit partially populated.
//!
//! Executing a wasm module means:
//! - instantiating it (running its start function, if any),
//! - binding exported globals as `Int`/`Float` attributes and exported functions
//! 	as callable attributes,
//! - calling the `_init` export, which may assign further attributes through the
//! 	`unit.*` host imports (see [`host`]).

use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::{ debug, trace };
use wasmtime::{ Config, Engine, Extern, Linker, Module, Store, Trap };

use crate::{ Callable, ContentSource, ExportedFunction, LogicalName, Unit, Value };
use crate::descriptor::NativeSource ;
use crate::unit::WasmRuntime ;

pub mod host ;
pub use host::HostState ;



/// Error type native content and native functions report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync> ;

/// Export run after instantiation to populate the unit.
pub const INIT_EXPORT: &str = "_init" ;

/// Errors raised while obtaining a unit's content.
#[derive( Error, Debug )]
pub enum LoadError {
	/// The content file does not exist.
	#[error( "Source Not Found: {}", .0.display() )] NotFound( PathBuf ),
	/// The content file exists but could not be read.
	#[error( "Unreadable Source {}: {source}", .path.display() )]
	Unreadable { path: PathBuf, source: std::io::Error },
	/// The file is not a valid WebAssembly module.
	#[error( "Invalid Module {}: {error}", .path.display() )]
	Compile { path: PathBuf, error: wasmtime::Error },
	/// The wasmtime engine or linker could not be set up.
	#[error( "Engine Error: {0}" )] Engine( wasmtime::Error ),
	/// The unit ran out of fuel while executing its content.
	#[error( "Execution Budget Exhausted" )] BudgetExhausted,
}

impl LoadError {
	pub fn kind( &self ) -> &'static str { "LoadError" }
}

/// Errors raised while running unit content or a unit's functions.
#[derive( Error, Debug )]
pub enum ExecutionError {
	/// The wasm code trapped or a host import failed.
	#[error( "Runtime Exception: {0}" )] Trap( wasmtime::Error ),
	/// Native code returned an error.
	#[error( "Raised: {0}" )] Raised( BoxError ),
	/// The configured fuel budget ran out.
	#[error( "Execution Budget Exhausted" )] BudgetExhausted,
	/// The `_init` export has a signature other than `() -> ()`.
	#[error( "Invalid Init Export: {0}" )] InvalidInit( String ),
	/// A callable declares parameters matching neither calling convention.
	#[error( "Unsupported Signature: {name} declares {params} parameters" )]
	UnsupportedSignature { name: String, params: usize },
	/// The attribute exists but is not a function.
	#[error( "Not Callable: {0}" )] NotCallable( String ),
	/// The returned value cannot be read as an integer status.
	#[error( "Not An Integer: {0}" )] NotAnInteger( String ),
	/// The unit has no wasm instance to call into.
	#[error( "Instance Unavailable: {0}" )] InstanceUnavailable( LogicalName ),
	/// Failed to acquire the lock on the unit's instance.
	#[error( "Lock Rejected" )] LockRejected,
}

impl ExecutionError {

	pub fn kind( &self ) -> &'static str { "ExecutionError" }

	pub(crate) fn from_wasm( error: wasmtime::Error ) -> Self {
		match error.downcast_ref::<Trap>() {
			Some( Trap::OutOfFuel ) => Self::BudgetExhausted,
			_ => Self::Trap( error ),
		}
	}

}

/// Content obtained by [`Loader::prepare`], ready to run.
pub enum Prepared {
	Wasm( Module ),
	Native( NativeSource ),
}

/// Compiles and executes unit content.
///
/// Holds the wasmtime [`Engine`] and a [`Linker`] with the host imports
/// registered once; every wasm unit gets its own [`Store`].
pub struct Loader {
	engine: Engine,
	linker: Linker<HostState>,
	fuel: Option<u64>,
}

impl Loader {

	/// Creates a loader. With a `fuel` budget the engine meters execution and
	/// every content run or function call starts with that much fuel.
	///
	/// # Errors
	/// Returns [`LoadError::Engine`] if the engine or host imports cannot be set up.
	pub fn new( fuel: Option<u64> ) -> Result<Self, LoadError> {
		let mut config = Config::new();
		config.consume_fuel( fuel.is_some() );
		let engine = Engine::new( &config ).map_err( LoadError::Engine )?;
		let mut linker = Linker::new( &engine );
		host::add_to_linker( &mut linker ).map_err( LoadError::Engine )?;
		Ok( Self { engine, linker, fuel })
	}

	/// Obtains the content behind `source`.
	///
	/// # Errors
	/// Fails if the file is missing, unreadable, or not a valid module.
	pub fn prepare( &self, source: &ContentSource ) -> Result<Prepared, LoadError> {
		match source {
			ContentSource::Native( native ) => Ok( Prepared::Native( native.clone() )),
			ContentSource::File( path ) => read_source( path )?
				.pipe(| bytes | Module::new( &self.engine, bytes ))
				.map( Prepared::Wasm )
				.map_err(| error | LoadError::Compile { path: path.clone(), error }),
		}
	}

	/// Runs prepared content against `unit`.
	///
	/// # Errors
	/// Fails if the content traps or reports an error; whatever was bound
	/// before the failure stays on the unit.
	pub fn execute( &self, prepared: Prepared, unit: &Arc<Unit> ) -> Result<(), ExecutionError> {
		debug!( unit = %unit.name(), origin = unit.origin(), "executing unit content" );
		match prepared {
			Prepared::Native( native ) => native.run( unit ).map_err( ExecutionError::Raised ),
			Prepared::Wasm( module ) => self.execute_module( &module, unit ),
		}
	}

	fn execute_module( &self, module: &Module, unit: &Arc<Unit> ) -> Result<(), ExecutionError> {

		let mut store = Store::new( &self.engine, HostState::new( Arc::downgrade( unit )));
		if let Some( fuel ) = self.fuel { store.set_fuel( fuel ).map_err( ExecutionError::Trap )?; }

		let instance = self.linker.instantiate( &mut store, module ).map_err( ExecutionError::from_wasm )?;

		let exports = instance.exports( &mut store )
			.map(| export | ( export.name().to_string(), export.into_extern() ))
			.collect::<Vec<_>>();

		for ( name, export ) in exports { match export {
			Extern::Global( global ) => if let Some( value ) = Value::from_wasm( &global.get( &mut store )) {
				trace!( unit = %unit.name(), attribute = %name, "binding exported global" );
				unit.set( name, value );
			},
			Extern::Func( func ) if name != INIT_EXPORT => {
				let function = ExportedFunction::new( name.as_str(), &func.ty( &store ));
				trace!( unit = %unit.name(), attribute = %name, shape = ?function.shape(), "binding exported function" );
				unit.set( name, Callable::Export( function ));
			},
			_ => {},
		}}

		let result = match instance.get_func( &mut store, INIT_EXPORT ) {
			Some( init ) => init.typed::<(), ()>( &store )
				.map_err(| err | ExecutionError::InvalidInit( err.to_string() ))
				.and_then(| init | init.call( &mut store, () ).map_err( ExecutionError::from_wasm )),
			None => Ok(()),
		};

		store.data_mut().loading = false ;
		unit.attach_runtime( WasmRuntime { store, instance, fuel: self.fuel });
		result

	}

}

impl std::fmt::Debug for Loader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Loader" )
			.field( "engine", &"<Engine>" )
			.field( "fuel", &self.fuel )
			.finish_non_exhaustive()
	}
}

fn read_source( path: &Path ) -> Result<Vec<u8>, LoadError> {
	std::fs::read( path ).map_err(| source | match source.kind() {
		std::io::ErrorKind::NotFound => LoadError::NotFound( path.to_path_buf() ),
		_ => LoadError::Unreadable { path: path.to_path_buf(), source },
	})
}
