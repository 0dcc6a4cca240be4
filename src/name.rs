/// Prefix reserved for units loaded from plugin files.
///
/// Keeps `path:` and convention-directory plugins out of the namespace used by
/// registered-name lookups, so `hello` and `__plugin__hello` never share a slot.
pub const PLUGIN_PREFIX: &str = "__plugin__" ;

/// The key a loaded [`Unit`]( crate::Unit ) is cached under.
///
/// Two sources loaded under the same `LogicalName` share one cache slot; the
/// later load replaces the earlier entry.
#[derive( Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct LogicalName( String );

impl LogicalName {

	/// Creates a logical name used verbatim as the cache key.
	pub fn new( name: impl Into<String> ) -> Self { Self( name.into() )}

	/// Creates the synthetic name of a plugin, `__plugin__<stem>`.
	pub fn plugin( stem: &str ) -> Self { Self( format!( "{}{}", PLUGIN_PREFIX, stem ))}

	#[inline] pub fn as_str( &self ) -> &str { &self.0 }

	/// Returns `true` for names produced by [`LogicalName::plugin`].
	#[inline] pub fn is_plugin( &self ) -> bool { self.0.starts_with( PLUGIN_PREFIX ) }

}

impl std::fmt::Display for LogicalName {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 )}
}

impl From<&str> for LogicalName {
	fn from( name: &str ) -> Self { Self::new( name )}
}

impl From<String> for LogicalName {
	fn from( name: String ) -> Self { Self( name )}
}

impl AsRef<str> for LogicalName {
	fn as_ref( &self ) -> &str { &self.0 }
}
