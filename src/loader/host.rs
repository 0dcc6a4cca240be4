//! Host imports available to wasm units.
//!
//! | Import | Signature | Effect |
//! |--------|-----------|--------|
//! | `unit.set_int` | `(key_ptr, key_len, i64)` | binds an `Int` attribute |
//! | `unit.set_float` | `(key_ptr, key_len, f64)` | binds a `Float` attribute |
//! | `unit.set_str` | `(key_ptr, key_len, val_ptr, val_len)` | binds a `Str` attribute |
//! | `args.count` | `() -> i32` | number of invocation arguments |
//! | `args.size` | `(index) -> i32` | byte length of an argument, `-1` if out of range |
//! | `args.read` | `(index, ptr) -> i32` | copies an argument to `ptr`, returns its length or `-1` |
//! | `host.print` | `(ptr, len)` | writes a line to standard output |
//!
//! Strings are UTF-8 and live in the unit's exported `memory`. The `unit.*`
//! imports only work while the unit's content runs; called later, from an
//! invoked function, they trap and the unit keeps its attributes.

use std::io::Write ;
use std::sync::Weak ;
use tracing::trace ;
use wasmtime::{ Caller, Extern, Linker, Memory };

use crate::{ Unit, Value };



/// Data stored in every unit's wasmtime `Store`.
pub struct HostState {
	unit: Weak<Unit>,
	pub(crate) loading: bool,
	pub(crate) args: Vec<String>,
}

impl HostState {
	pub(crate) fn new( unit: Weak<Unit> ) -> Self { Self { unit, loading: true, args: Vec::with_capacity( 0 ) }}
}

impl std::fmt::Debug for HostState {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "HostState" )
			.field( "loading", &self.loading )
			.field( "args", &self.args )
			.finish_non_exhaustive()
	}
}

pub(crate) fn add_to_linker( linker: &mut Linker<HostState> ) -> wasmtime::Result<()> {

	linker.func_wrap( "unit", "set_int", | mut caller: Caller<'_, HostState>, key_ptr: i32, key_len: i32, value: i64 | {
		let key = read_string( &mut caller, key_ptr, key_len )?;
		bind( &caller, key, Value::Int( value ))
	})?;

	linker.func_wrap( "unit", "set_float", | mut caller: Caller<'_, HostState>, key_ptr: i32, key_len: i32, value: f64 | {
		let key = read_string( &mut caller, key_ptr, key_len )?;
		bind( &caller, key, Value::Float( value ))
	})?;

	linker.func_wrap( "unit", "set_str", | mut caller: Caller<'_, HostState>, key_ptr: i32, key_len: i32, value_ptr: i32, value_len: i32 | {
		let key = read_string( &mut caller, key_ptr, key_len )?;
		let value = read_string( &mut caller, value_ptr, value_len )?;
		bind( &caller, key, Value::Str( value ))
	})?;

	linker.func_wrap( "args", "count", | caller: Caller<'_, HostState> | -> i32 {
		i32::try_from( caller.data().args.len() ).unwrap_or( i32::MAX )
	})?;

	linker.func_wrap( "args", "size", | caller: Caller<'_, HostState>, index: i32 | -> i32 {
		argument( &caller, index ).map_or( -1, | arg | i32::try_from( arg.len() ).unwrap_or( i32::MAX ))
	})?;

	linker.func_wrap( "args", "read", | mut caller: Caller<'_, HostState>, index: i32, ptr: i32 | -> wasmtime::Result<i32> {
		let Some( arg ) = argument( &caller, index ).map( str::to_owned ) else { return Ok( -1 )};
		let offset = usize::try_from( ptr ).map_err(|_| wasmtime::Error::msg( "negative pointer" ))?;
		memory( &mut caller )?.write( &mut caller, offset, arg.as_bytes() )?;
		Ok( i32::try_from( arg.len() ).unwrap_or( i32::MAX ))
	})?;

	linker.func_wrap( "host", "print", | mut caller: Caller<'_, HostState>, ptr: i32, len: i32 | -> wasmtime::Result<()> {
		let line = read_string( &mut caller, ptr, len )?;
		let mut stdout = std::io::stdout().lock();
		writeln!( stdout, "{}", line )?;
		Ok(())
	})?;

	Ok(())

}

fn bind( caller: &Caller<'_, HostState>, key: String, value: Value ) -> wasmtime::Result<()> {
	if !caller.data().loading {
		return Err( wasmtime::Error::msg( format!( "cannot bind {:?}: unit attributes are read-only once loaded", key )));
	}
	let unit = caller.data().unit.upgrade().ok_or_else(|| wasmtime::Error::msg( "unit is no longer alive" ))?;
	trace!( unit = %unit.name(), attribute = %key, "binding attribute from content" );
	unit.set( key, value );
	Ok(())
}

fn argument<'a>( caller: &'a Caller<'_, HostState>, index: i32 ) -> Option<&'a str> {
	let index = usize::try_from( index ).ok()?;
	caller.data().args.get( index ).map( String::as_str )
}

fn memory( caller: &mut Caller<'_, HostState> ) -> wasmtime::Result<Memory> {
	caller.get_export( "memory" )
		.and_then( Extern::into_memory )
		.ok_or_else(|| wasmtime::Error::msg( "missing export: memory" ))
}

fn read_string( caller: &mut Caller<'_, HostState>, ptr: i32, len: i32 ) -> wasmtime::Result<String> {
	let ( Ok( offset ), Ok( len )) = ( usize::try_from( ptr ), usize::try_from( len )) else {
		return Err( wasmtime::Error::msg( "negative pointer or length" ));
	};
	let mut buffer = vec![ 0u8; len ];
	memory( caller )?.read( &*caller, offset, &mut buffer )?;
	String::from_utf8( buffer ).map_err(| err | wasmtime::Error::msg( err.to_string() ))
}
