use std::path::Path ;
use itertools::Itertools ;
use tracing::debug ;



/// A unit file found in a convention directory.
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord )]
pub struct PluginInfo {
	/// File stem, usable as a bare `run` target.
	pub name: String,
	/// Absolute path of the file.
	pub origin: String,
}

/// Scans `base_dir` for unit files.
///
/// Returns the files whose extension is one of `extensions` and whose name does
/// not start with `private_prefix`, sorted by file name. A directory that is
/// missing or cannot be read gives an empty list.
pub fn list_plugins( base_dir: &Path, extensions: &[String], private_prefix: &str ) -> Vec<PluginInfo> {

	let base_dir = std::path::absolute( base_dir ).unwrap_or_else(|_| base_dir.to_path_buf() );
	let entries = match std::fs::read_dir( &base_dir ) {
		Ok( entries ) => entries,
		Err( err ) => {
			debug!( dir = %base_dir.display(), error = %err, "plugin directory not readable" );
			return Vec::new();
		},
	};

	entries
		.filter_map( Result::ok )
		.map(| entry | entry.path() )
		.filter(| path | path.is_file() )
		.filter(| path | path.extension()
			.and_then(| ext | ext.to_str() )
			.is_some_and(| ext | extensions.iter().any(| known | known == ext ))
		)
		.filter_map(| path | {
			let file_name = path.file_name()?.to_string_lossy().into_owned();
			if !private_prefix.is_empty() && file_name.starts_with( private_prefix ) { return None }
			Some(( file_name, path ))
		})
		.sorted_by(| ( a, _ ), ( b, _ ) | a.cmp( b ))
		.map(| ( _, path ) | PluginInfo {
			name: path.file_stem().unwrap_or_default().to_string_lossy().into_owned(),
			origin: path.display().to_string(),
		})
		.collect()

}
