//! Attribute values stored on a [`Unit`]( crate::Unit ).
//!
//! Data attributes are plain values. Callable attributes remember how they
//! must be called: the calling shape is read from the declared parameter count
//! when the unit is loaded, so invocation never has to guess from a failed call.

use std::sync::Arc ;
use wasmtime::{ FuncType, ValType };

use crate::loader::{ BoxError, ExecutionError };



/// A value bound to an attribute of a unit.
#[derive( Clone, Debug )]
pub enum Value {
	Int( i64 ),
	Float( f64 ),
	Str( String ),
	Func( Callable ),
}

impl Value {

	#[inline] pub fn as_int( &self ) -> Option<i64> { match self { Self::Int( value ) => Some( *value ), _ => None }}
	#[inline] pub fn as_float( &self ) -> Option<f64> { match self { Self::Float( value ) => Some( *value ), _ => None }}
	#[inline] pub fn as_str( &self ) -> Option<&str> { match self { Self::Str( value ) => Some( value ), _ => None }}
	#[inline] pub fn as_callable( &self ) -> Option<&Callable> { match self { Self::Func( callable ) => Some( callable ), _ => None }}

	/// Short type name used in error messages.
	pub fn type_name( &self ) -> &'static str { match self {
		Self::Int( _ ) => "int",
		Self::Float( _ ) => "float",
		Self::Str( _ ) => "str",
		Self::Func( _ ) => "function",
	}}

	/// Coerces the value into an integer status.
	///
	/// Floats are truncated toward zero, strings must hold a decimal integer.
	///
	/// # Errors
	/// Returns [`ExecutionError::NotAnInteger`] when the value has no integer reading.
	pub fn to_status( &self ) -> Result<i64, ExecutionError> {
		match self {
			Self::Int( value ) => Ok( *value ),
			#[allow( clippy::cast_possible_truncation )]
			Self::Float( value ) if value.is_finite() => Ok( value.trunc() as i64 ),
			Self::Str( text ) => text.trim().parse::<i64>()
				.map_err(|_| ExecutionError::NotAnInteger( format!( "str {:?}", text ))),
			other => Err( ExecutionError::NotAnInteger( other.type_name().to_string() )),
		}
	}

	/// Reads an exported wasm global or function result.
	pub(crate) fn from_wasm( value: &wasmtime::Val ) -> Option<Self> {
		match value {
			wasmtime::Val::I32( value ) => Some( Self::Int( i64::from( *value ))),
			wasmtime::Val::I64( value ) => Some( Self::Int( *value )),
			wasmtime::Val::F32( bits ) => Some( Self::Float( f64::from( f32::from_bits( *bits )))),
			wasmtime::Val::F64( bits ) => Some( Self::Float( f64::from_bits( *bits ))),
			_ => None,
		}
	}

}

impl From<i64> for Value { fn from( value: i64 ) -> Self { Self::Int( value )}}
impl From<i32> for Value { fn from( value: i32 ) -> Self { Self::Int( i64::from( value ))}}
impl From<f64> for Value { fn from( value: f64 ) -> Self { Self::Float( value )}}
impl From<&str> for Value { fn from( value: &str ) -> Self { Self::Str( value.to_string() )}}
impl From<String> for Value { fn from( value: String ) -> Self { Self::Str( value )}}
impl From<Callable> for Value { fn from( value: Callable ) -> Self { Self::Func( value )}}
impl From<NativeFunction> for Value { fn from( value: NativeFunction ) -> Self { Self::Func( Callable::Native( value ))}}

/// How a callable expects to be invoked.
#[derive( Copy, Clone, Debug, PartialEq, Eq )]
pub enum CallShape {
	/// Takes the argument list.
	WithArgs,
	/// Takes no arguments.
	NoArgs,
	/// Declares a parameter list matching neither convention.
	Unsupported( usize ),
}

/// A callable attribute.
#[derive( Clone, Debug )]
pub enum Callable {
	/// A Rust function attached by native content.
	Native( NativeFunction ),
	/// A function exported by the unit's wasm instance.
	Export( ExportedFunction ),
}

impl Callable {
	pub fn shape( &self ) -> CallShape { match self {
		Self::Native( function ) => function.shape(),
		Self::Export( function ) => function.shape(),
	}}
}

type ArgsFn = dyn Fn( &[String] ) -> Result<Value, BoxError> + Send + Sync ;
type NoArgsFn = dyn Fn() -> Result<Value, BoxError> + Send + Sync ;

/// A native function with one of the two supported calling shapes.
#[derive( Clone )]
pub enum NativeFunction {
	WithArgs( Arc<ArgsFn> ),
	NoArgs( Arc<NoArgsFn> ),
}

impl NativeFunction {

	pub fn with_args<F>( function: F ) -> Self
	where F: Fn( &[String] ) -> Result<Value, BoxError> + Send + Sync + 'static {
		Self::WithArgs( Arc::new( function ))
	}

	pub fn no_args<F>( function: F ) -> Self
	where F: Fn() -> Result<Value, BoxError> + Send + Sync + 'static {
		Self::NoArgs( Arc::new( function ))
	}

	pub fn shape( &self ) -> CallShape { match self {
		Self::WithArgs( _ ) => CallShape::WithArgs,
		Self::NoArgs( _ ) => CallShape::NoArgs,
	}}

}

impl std::fmt::Debug for NativeFunction {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "NativeFunction" ).field( &self.shape() ).finish()
	}
}

/// A wasm export bound as an attribute.
///
/// The function itself lives in the unit's store; this records its name and
/// the calling shape derived from the signature observed at load time.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct ExportedFunction {
	name: String,
	shape: CallShape,
	results: usize,
}

impl ExportedFunction {

	/// `main()` takes nothing, `main(argc: i32)` takes the argument list
	/// (the strings themselves are read through the `args` host imports).
	pub(crate) fn new( name: impl Into<String>, ty: &FuncType ) -> Self {
		let params = ty.params().collect::<Vec<_>>();
		let shape = match params.as_slice() {
			[] => CallShape::NoArgs,
			[ ValType::I32 ] => CallShape::WithArgs,
			params => CallShape::Unsupported( params.len() ),
		};
		Self { name: name.into(), shape, results: ty.results().len() }
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn shape( &self ) -> CallShape { self.shape }
	#[inline] pub fn result_count( &self ) -> usize { self.results }

}
