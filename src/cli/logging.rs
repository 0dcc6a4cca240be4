use tracing_subscriber::{ fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };



/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "warn" ;

/// Picks the filter directives: `RUST_LOG` first, then the config's filter,
/// then `debug` when verbose, then [`DEFAULT_FILTER`].
pub fn filter_directives( rust_log: Option<String>, configured: Option<&str>, verbose: bool ) -> String {
	rust_log
		.or_else(|| configured.map( str::to_string ))
		.unwrap_or_else(|| if verbose { "debug".to_string() } else { DEFAULT_FILTER.to_string() })
}

/// Installs the global `tracing` subscriber. Logs go to standard error so
/// that unit output on standard output stays clean.
pub fn init_logging( configured: Option<&str>, verbose: bool ) {
	let directives = filter_directives( std::env::var( "RUST_LOG" ).ok(), configured, verbose );
	tracing_subscriber::registry()
		.with( fmt::layer()
			.with_writer( std::io::stderr )
			.with_target( true )
			.with_ansi( std::env::var_os( "NO_COLOR" ).is_none() )
		)
		.with( EnvFilter::new( directives ))
		.init();
}
