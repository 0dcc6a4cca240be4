//! The process-wide unit registry.
//!
//! Every slot is either `Ready` with a committed unit or `Loading` while some
//! thread executes a unit's content. A `Loading` slot is an in-flight marker:
//! other threads asking for the same name wait until it settles, while the
//! loading thread itself gets back whatever partial unit has been published so
//! far, so content that imports itself sees its own half-built record.
//!
//! Waiting threads are recorded with the name they wait for. A thread that
//! would wait on a chain of loads ending at a load it owns itself is treated
//! like a re-entrant request instead of blocking forever.

use std::collections::HashMap ;
use std::sync::{ Arc, Condvar, Mutex, MutexGuard, PoisonError };
use std::thread::ThreadId ;
use itertools::Itertools ;
use serde::Deserialize ;
use tracing::debug ;

use crate::{ LogicalName, Unit };



/// When a freshly allocated unit becomes visible in the cache.
#[derive( Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub enum CachePolicy {
	/// Published before its content runs and kept even if execution fails.
	#[default]
	Eager,
	/// Published only once its content ran to completion.
	OnSuccess,
}

#[derive( Debug )]
enum Slot {
	Loading { owner: ThreadId, previous: Option<Arc<Unit>>, partial: Option<Arc<Unit>> },
	Ready( Arc<Unit> ),
}

/// What a caller finds when it asks to load a name.
#[derive( Debug )]
pub enum Lookup<'a> {
	/// A committed unit, or the partial unit of a load running on this thread.
	Hit( Arc<Unit> ),
	/// This thread is already loading the name and nothing has been published.
	Circular,
	/// The caller now owns the slot and must load the unit.
	Claimed( LoadClaim<'a> ),
}

#[derive( Debug, Default )]
struct Slots {
	entries: HashMap<LogicalName, Slot>,
	waiting: HashMap<ThreadId, LogicalName>,
}

impl Slots {

	fn get( &self, name: &LogicalName ) -> Option<&Slot> { self.entries.get( name ) }

	/// Follows the owner to waited-for-name edges from the load of `name`.
	fn leads_back_to( &self, name: &LogicalName, me: ThreadId ) -> bool {
		let mut name = name ;
		for _ in 0..=self.waiting.len() {
			let Some( Slot::Loading { owner, .. }) = self.entries.get( name ) else { return false };
			if *owner == me { return true }
			match self.waiting.get( owner ) {
				Some( next ) => name = next,
				None => return false,
			}
		}
		false
	}

}

/// Thread-safe mapping from [`LogicalName`] to loaded [`Unit`].
#[derive( Default )]
pub struct UnitCache {
	slots: Mutex<Slots>,
	settled: Condvar,
}

impl UnitCache {

	pub fn new() -> Self { Self::default() }

	fn lock( &self ) -> MutexGuard<'_, Slots> {
		self.slots.lock().unwrap_or_else( PoisonError::into_inner )
	}

	fn wait<'a>( &self, mut guard: MutexGuard<'a, Slots>, name: &LogicalName, me: ThreadId ) -> MutexGuard<'a, Slots> {
		guard.waiting.insert( me, name.clone() );
		let mut guard = self.settled.wait( guard ).unwrap_or_else( PoisonError::into_inner );
		guard.waiting.remove( &me );
		guard
	}

	/// The committed unit for `name`. Loads in flight are not visible.
	pub fn get( &self, name: &LogicalName ) -> Option<Arc<Unit>> {
		match self.lock().get( name ) {
			Some( Slot::Ready( unit )) => Some( Arc::clone( unit )),
			Some( Slot::Loading { previous, .. }) => previous.clone(),
			None => None,
		}
	}

	/// Returns `true` if a committed unit is cached under `name`.
	pub fn contains( &self, name: &LogicalName ) -> bool { self.get( name ).is_some() }

	/// Origin label of the committed unit for `name`.
	pub fn origin( &self, name: &LogicalName ) -> Option<String> {
		self.get( name ).map(| unit | unit.origin().to_string() )
	}

	/// Names with a committed unit, sorted.
	pub fn names( &self ) -> Vec<LogicalName> {
		self.lock().entries.iter()
			.filter(| ( _, slot ) | matches!( slot, Slot::Ready( _ ) | Slot::Loading { previous: Some( _ ), .. }))
			.map(| ( name, _ ) | name.clone() )
			.sorted()
			.collect()
	}

	#[inline] pub fn len( &self ) -> usize { self.names().len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.len() == 0 }

	/// Looks `name` up, claiming the slot if there is nothing to return.
	///
	/// Blocks while another thread is loading the same name, unless that load
	/// is itself waiting on one this thread owns. Such a cycle is answered
	/// like a re-entrant request: with the published partial unit, or
	/// [`Lookup::Circular`].
	pub fn lookup( &self, name: &LogicalName ) -> Lookup<'_> {
		let me = std::thread::current().id();
		let mut slots = self.lock();
		loop {
			match slots.get( name ) {
				Some( Slot::Ready( unit )) => return Lookup::Hit( Arc::clone( unit )),
				Some( Slot::Loading { owner, partial, .. }) if *owner == me || slots.leads_back_to( name, me ) => {
					if *owner != me { debug!( name = %name, "import cycle across threads, not waiting" ); }
					return match partial {
						Some( unit ) => Lookup::Hit( Arc::clone( unit )),
						None => Lookup::Circular,
					}
				},
				Some( Slot::Loading { .. }) => slots = self.wait( slots, name, me ),
				None => break,
			}
		}
		slots.entries.insert( name.clone(), Slot::Loading { owner: me, previous: None, partial: None });
		Lookup::Claimed( LoadClaim { cache: self, name: name.clone(), settled: false })
	}

	/// Claims `name` to load a replacement for its current entry.
	///
	/// Waits for loads in flight on other threads. Returns `None` if this
	/// thread is itself loading `name`, or waiting would close a cycle.
	pub fn claim( &self, name: &LogicalName ) -> Option<LoadClaim<'_>> {
		let me = std::thread::current().id();
		let mut slots = self.lock();
		loop {
			match slots.get( name ) {
				Some( Slot::Loading { .. }) if slots.leads_back_to( name, me ) => return None,
				Some( Slot::Loading { .. }) => slots = self.wait( slots, name, me ),
				_ => break,
			}
		}
		let previous = match slots.entries.remove( name ) {
			Some( Slot::Ready( unit )) => Some( unit ),
			_ => None,
		};
		slots.entries.insert( name.clone(), Slot::Loading { owner: me, previous, partial: None });
		Some( LoadClaim { cache: self, name: name.clone(), settled: false })
	}

	/// Stores `unit` under its name, replacing whatever is there.
	///
	/// Waits for loads of the same name in flight on other threads.
	pub fn insert( &self, unit: Arc<Unit> ) -> Option<Arc<Unit>> {
		let name = unit.name().clone();
		let me = std::thread::current().id();
		let mut slots = self.lock();
		while matches!( slots.get( &name ), Some( Slot::Loading { owner, .. }) if *owner != me ) {
			slots = self.wait( slots, &name, me );
		}
		let previous = match slots.entries.insert( name, Slot::Ready( unit )) {
			Some( Slot::Ready( unit )) => Some( unit ),
			Some( Slot::Loading { previous, .. }) => previous,
			None => None,
		};
		self.settled.notify_all();
		previous
	}

}

impl std::fmt::Debug for UnitCache {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "UnitCache" ).field( "names", &self.names() ).finish_non_exhaustive()
	}
}

/// Exclusive right to load one name.
///
/// Dropping a claim without committing restores the entry that was there
/// before and wakes any waiting threads.
#[must_use]
pub struct LoadClaim<'a> {
	cache: &'a UnitCache,
	name: LogicalName,
	settled: bool,
}

impl LoadClaim<'_> {

	#[inline] pub fn name( &self ) -> &LogicalName { &self.name }

	/// Makes a partially populated unit visible to re-entrant lookups on the
	/// claiming thread.
	pub fn publish( &self, unit: &Arc<Unit> ) {
		if let Some( Slot::Loading { partial, .. }) = self.cache.lock().entries.get_mut( &self.name ) {
			*partial = Some( Arc::clone( unit ));
		}
	}

	/// The committed entry this claim would replace.
	pub fn previous( &self ) -> Option<Arc<Unit>> {
		match self.cache.lock().get( &self.name ) {
			Some( Slot::Loading { previous, .. }) => previous.clone(),
			_ => None,
		}
	}

	/// Commits `unit` as the entry for the claimed name.
	pub fn commit( mut self, unit: Arc<Unit> ) {
		self.settle( Some( unit ));
	}

	/// Commits whatever was published, or restores the previous entry if
	/// nothing was.
	pub fn keep_published( mut self ) {
		let published = match self.cache.lock().get( &self.name ) {
			Some( Slot::Loading { partial, .. }) => partial.clone(),
			_ => None,
		};
		self.settle( published );
	}

	fn settle( &mut self, unit: Option<Arc<Unit>> ) {
		let mut slots = self.cache.lock();
		let previous = match slots.entries.remove( &self.name ) {
			Some( Slot::Loading { previous, .. }) => previous,
			Some( Slot::Ready( unit )) => Some( unit ),
			None => None,
		};
		match unit.or( previous ) {
			Some( unit ) => { slots.entries.insert( self.name.clone(), Slot::Ready( unit )); },
			None => debug!( name = %self.name, "load abandoned, slot cleared" ),
		}
		self.settled = true ;
		self.cache.settled.notify_all();
	}

}

impl Drop for LoadClaim<'_> {
	fn drop( &mut self ) {
		if !self.settled {
			debug!( name = %self.name, "load claim released, restoring previous entry" );
			self.settle( None );
		}
	}
}

impl std::fmt::Debug for LoadClaim<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoadClaim" ).field( "name", &self.name ).finish_non_exhaustive()
	}
}
