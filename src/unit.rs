use std::collections::HashMap ;
use std::path::Path ;
use std::sync::{ Mutex, PoisonError, RwLock };
use itertools::Itertools ;
use wasmtime::{ Instance, Store };

use crate::{ Descriptor, LogicalName, Value };
use crate::loader::{ ExecutionError, HostState };



/// Name of the attribute a unit must expose to be invocable.
pub const ENTRY_POINT: &str = "main" ;

/// A loaded unit of code.
///
/// Created empty by the loader and populated while its content executes. After
/// that the record is left alone; a reload builds a new `Unit` and swaps it into
/// the cache, so holders of the old `Arc<Unit>` keep a consistent view.
///
/// Units backed by a wasm module also own the module's instance and store, which
/// exported function attributes are called through.
pub struct Unit {
	descriptor: Descriptor,
	attributes: RwLock<HashMap<String, Value>>,
	runtime: Mutex<Option<WasmRuntime>>,
}

pub(crate) struct WasmRuntime {
	pub store: Store<HostState>,
	pub instance: Instance,
	pub fuel: Option<u64>,
}

impl Unit {

	/// Allocates an empty unit for the given descriptor.
	pub fn new( descriptor: Descriptor ) -> Self {
		Self {
			descriptor,
			attributes: RwLock::new( HashMap::new() ),
			runtime: Mutex::new( None ),
		}
	}

	#[inline] pub fn name( &self ) -> &LogicalName { self.descriptor.name() }
	#[inline] pub fn descriptor( &self ) -> &Descriptor { &self.descriptor }

	/// Provenance label of the descriptor this unit was loaded from.
	#[inline] pub fn origin( &self ) -> &str { self.descriptor.origin() }

	/// The file this unit was loaded from; `None` for native units.
	#[inline] pub fn origin_path( &self ) -> Option<&Path> { self.descriptor.source().path() }

	/// Binds `value` to `key`, replacing any previous binding.
	pub fn set( &self, key: impl Into<String>, value: impl Into<Value> ) {
		self.attributes.write().unwrap_or_else( PoisonError::into_inner ).insert( key.into(), value.into() );
	}

	/// Returns a copy of the value bound to `key`.
	pub fn get( &self, key: &str ) -> Option<Value> {
		self.attributes.read().unwrap_or_else( PoisonError::into_inner ).get( key ).cloned()
	}

	pub fn contains( &self, key: &str ) -> bool {
		self.attributes.read().unwrap_or_else( PoisonError::into_inner ).contains_key( key )
	}

	/// Attribute names in lexicographic order.
	pub fn attribute_names( &self ) -> Vec<String> {
		self.attributes.read().unwrap_or_else( PoisonError::into_inner ).keys().cloned().sorted().collect()
	}

	pub fn is_invocable( &self ) -> bool {
		matches!( self.get( ENTRY_POINT ), Some( Value::Func( _ )))
	}

	pub(crate) fn attach_runtime( &self, runtime: WasmRuntime ) {
		*self.runtime.lock().unwrap_or_else( PoisonError::into_inner ) = Some( runtime );
	}

	/// Runs `action` against the unit's wasm instance.
	pub(crate) fn with_runtime<T>(
		&self,
		action: impl FnOnce( &mut WasmRuntime ) -> Result<T, ExecutionError>,
	) -> Result<T, ExecutionError> {
		let mut lock = self.runtime.lock().map_err(|_| ExecutionError::LockRejected )?;
		let runtime = lock.as_mut().ok_or_else(|| ExecutionError::InstanceUnavailable( self.name().clone() ))?;
		action( runtime )
	}

}

impl std::fmt::Debug for Unit {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Unit" )
			.field( "name", self.name() )
			.field( "origin", &self.origin() )
			.field( "attributes", &self.attribute_names() )
			.finish_non_exhaustive()
	}
}
