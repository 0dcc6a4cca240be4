//! Calling a unit's entry point.
//!
//! The entry point is the `main` attribute. Its calling shape was fixed when the
//! unit was loaded: a `WithArgs` entry point gets the argument list, a `NoArgs`
//! one is called without it. For wasm units, `main(argc: i32)` receives the
//! argument count and reads the strings through the `args` host imports.

use thiserror::Error ;
use tracing::debug ;
use wasmtime::Val ;

use crate::{ Callable, CallShape, ExportedFunction, LogicalName, NativeFunction, Unit, Value };
use crate::loader::ExecutionError ;
use crate::unit::ENTRY_POINT ;



#[derive( Error, Debug )]
pub enum InvokeError {
	/// The unit has no `main` attribute. Nothing was called.
	#[error( "Unit {0} has no entry point `main`" )] MissingEntryPoint( LogicalName ),
	#[error( transparent )] Execution( #[from] ExecutionError ),
}

impl InvokeError {
	pub fn kind( &self ) -> &'static str { match self {
		Self::MissingEntryPoint( _ ) => "MissingEntryPointError",
		Self::Execution( err ) => err.kind(),
	}}
}

/// Calls the entry point of `unit` and coerces its result to an integer status.
///
/// # Errors
/// Returns [`InvokeError::MissingEntryPoint`] if there is no `main`, and an
/// [`ExecutionError`] if `main` is not callable, fails, or returns something
/// without an integer reading.
pub fn invoke( unit: &Unit, args: &[String] ) -> Result<i64, InvokeError> {
	let entry = unit.get( ENTRY_POINT ).ok_or_else(|| InvokeError::MissingEntryPoint( unit.name().clone() ))?;
	let callable = match entry {
		Value::Func( callable ) => callable,
		other => return Err( ExecutionError::NotCallable( format!( "{} is a {}", ENTRY_POINT, other.type_name() )).into() ),
	};
	debug!( unit = %unit.name(), shape = ?callable.shape(), args = args.len(), "invoking entry point" );
	let status = call( unit, &callable, args )?
		.ok_or_else(|| ExecutionError::NotAnInteger( "no value".to_string() ))?
		.to_status()?;
	Ok( status )
}

fn call( unit: &Unit, callable: &Callable, args: &[String] ) -> Result<Option<Value>, ExecutionError> {
	match callable {
		Callable::Native( NativeFunction::WithArgs( function )) => function( args ).map( Some ).map_err( ExecutionError::Raised ),
		Callable::Native( NativeFunction::NoArgs( function )) => function().map( Some ).map_err( ExecutionError::Raised ),
		Callable::Export( function ) => call_export( unit, function, args ),
	}
}

fn call_export( unit: &Unit, function: &ExportedFunction, args: &[String] ) -> Result<Option<Value>, ExecutionError> {

	let params = match function.shape() {
		CallShape::WithArgs => vec![ Val::I32( i32::try_from( args.len() ).unwrap_or( i32::MAX ))],
		CallShape::NoArgs => Vec::new(),
		CallShape::Unsupported( params ) => return Err( ExecutionError::UnsupportedSignature {
			name: function.name().to_string(),
			params,
		}),
	};

	unit.with_runtime(| runtime | {

		let func = runtime.instance.get_func( &mut runtime.store, function.name() )
			.ok_or_else(|| ExecutionError::NotCallable( function.name().to_string() ))?;
		if let Some( fuel ) = runtime.fuel { runtime.store.set_fuel( fuel ).map_err( ExecutionError::Trap )?; }

		if function.shape() == CallShape::WithArgs { runtime.store.data_mut().args = args.to_vec(); }
		let mut results = vec![ Val::I32( 0 ); function.result_count() ];
		let outcome = func.call( &mut runtime.store, &params, &mut results );
		runtime.store.data_mut().args.clear();

		outcome.map_err( ExecutionError::from_wasm )?;
		Ok( results.first().and_then( Value::from_wasm ))

	})

}
