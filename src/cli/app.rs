use std::io::Write ;
use std::path::PathBuf ;
use std::process::ExitCode ;
use anyhow::{ Context, Result };
use clap::{ CommandFactory, Parser, Subcommand };
use thiserror::Error ;
use tracing::{ debug, warn };

use crate::{ invoke, list_plugins, ConfigError, ImportError, Importer, InvokeError, LoadError, ReloadError, ResolutionIntent, RunnerConfig };
use super::logging::init_logging ;



#[derive( Parser, Debug )]
#[command( name = "task-runner" )]
#[command( version, about = "Plugin-based task runner over dynamically loaded WebAssembly units" )]
pub struct Cli {
	/// Directory with single-file plugins (*.wat, *.wasm). Default: ./plugins
	#[arg( long, env = "TASK_RUNNER_PLUGIN_DIR" )]
	pub plugin_dir: Option<PathBuf>,

	/// Config file. Default: ./task-runner.toml if present
	#[arg( long, env = "TASK_RUNNER_CONFIG" )]
	pub config: Option<PathBuf>,

	/// List available plugins from the plugin directory
	#[arg( long )]
	pub list: bool,

	/// Show where a unit name would be imported from
	#[arg( long = "where", value_name = "NAME" )]
	pub where_name: Option<String>,

	/// Print the resolver chain in consultation order
	#[arg( long )]
	pub resolvers: bool,

	/// Enable debug logging
	#[arg( long, short = 'v' )]
	pub verbose: bool,

	#[command( subcommand )]
	pub command: Option<Commands>,
}

#[derive( Subcommand, Debug )]
pub enum Commands {
	/// Run a plugin by name, file path, or registered name
	Run {
		/// Plugin name (from the plugin directory), "path:./plugins/x.wat", or "name:echo"
		target: String,

		/// Reload the unit before calling it
		#[arg( long )]
		reload: bool,

		/// Fail instead of continuing when the reload fails
		#[arg( long )]
		strict_reload: bool,

		/// Arguments passed to the unit's main, after --
		#[arg( last = true )]
		args: Vec<String>,
	},
}

/// Everything `run` can fail with, reported as `[error] <target>: <kind>: <message>`.
#[derive( Error, Debug )]
enum RunError {
	#[error( transparent )] Import( #[from] ImportError ),
	#[error( transparent )] Reload( #[from] ReloadError ),
	#[error( transparent )] Invoke( #[from] InvokeError ),
	#[error( transparent )] Io( #[from] std::io::Error ),
}

impl RunError {
	fn kind( &self ) -> &'static str { match self {
		Self::Import( err ) => err.kind(),
		Self::Reload( err ) => err.kind(),
		Self::Invoke( err ) => err.kind(),
		Self::Io( _ ) => "IoError",
	}}
}

/// Parses the process arguments and executes them.
///
/// # Errors
/// Fails on configuration, engine setup and output errors. Failures of the
/// requested unit are reported on standard error and turned into exit code 1.
pub fn run() -> Result<ExitCode> {

	let cli = Cli::parse();

	let mut config = RunnerConfig::discover( cli.config.as_deref() ).context( "Failed to load configuration" )?;
	if let Some( dir ) = cli.plugin_dir { config.plugin_dir = dir ; }
	init_logging( config.log_filter.as_deref(), cli.verbose );
	debug!( ?config, "configuration loaded" );

	let importer = Importer::from_config( &config ).context( "Failed to set up the runtime" )?;
	let mut out = std::io::stdout().lock();

	if cli.resolvers {
		writeln!( out, "[resolvers] resolution order:" )?;
		for label in importer.resolvers() { writeln!( out, " - {}", label )?; }
	}

	if let Some( name ) = &cli.where_name {
		match importer.find_origin( &name.as_str().into() ) {
			Ok( origin ) => writeln!( out, "[where] {} -> {}", name, origin.as_deref().unwrap_or( "NOT FOUND" ))?,
			Err( err ) => {
				eprintln!( "[error] {}: {}: {}", name, err.kind(), err );
				return Ok( ExitCode::FAILURE );
			},
		}
	}

	if cli.list {
		let plugin_dir = std::path::absolute( &config.plugin_dir ).unwrap_or_else(|_| config.plugin_dir.clone() );
		let plugins = list_plugins( &plugin_dir, &config.extensions, &config.private_prefix );
		if plugins.is_empty() {
			writeln!( out, "[list] no plugins found in {}", plugin_dir.display() )?;
			writeln!( out, "[list] create {} to test", plugin_dir.join( "hello.wat" ).display() )?;
		} else {
			writeln!( out, "[list] plugins in {}:", plugin_dir.display() )?;
			for plugin in plugins { writeln!( out, " - {} ({})", plugin.name, plugin.origin )?; }
		}
		return Ok( ExitCode::SUCCESS );
	}

	match cli.command {
		Some( Commands::Run { target, reload, strict_reload, args }) => {
			let strict = strict_reload || config.strict_reload ;
			match run_target( &mut out, &importer, &config, &target, reload, strict, &args ) {
				Ok( status ) => Ok( exit_code( status )),
				Err( RunError::Io( err )) => Err( err.into() ),
				Err( err ) => {
					out.flush()?;
					eprintln!( "[error] {}: {}: {}", target, err.kind(), err );
					Ok( ExitCode::FAILURE )
				},
			}
		},
		None if !cli.resolvers && cli.where_name.is_none() => {
			Cli::command().print_help()?;
			Ok( ExitCode::SUCCESS )
		},
		None => Ok( ExitCode::SUCCESS ),
	}

}

fn run_target(
	out: &mut impl Write,
	importer: &Importer,
	config: &RunnerConfig,
	target: &str,
	reload: bool,
	strict_reload: bool,
	args: &[String],
) -> Result<i64, RunError> {

	let intent = ResolutionIntent::parse( target, &config.plugin_dir );
	let ( mut unit, mut label ) = intent.load( importer, &config.extensions )?;

	if reload {
		match importer.reload( &unit ) {
			Ok( fresh ) => {
				unit = fresh ;
				label.push_str( " (reloaded)" );
			},
			Err( err ) if strict_reload => return Err( err.into() ),
			Err( err ) => {
				warn!( name = %unit.name(), error = %err, "reload failed, keeping the previous unit" );
				writeln!( out, "[reload] failed, continuing without reload: {}", err )?;
			},
		}
	}

	writeln!( out, "[run] loaded: {}", label )?;
	writeln!( out, "[run] unit name: {}", unit.name() )?;
	match unit.origin_path() {
		Some( path ) => writeln!( out, "[run] unit file: {}", path.display() )?,
		None => writeln!( out, "[run] unit file: {}", unit.origin() )?,
	}
	out.flush()?;

	Ok( invoke( &unit, args )? )

}

/// Error kind of a failure that aborted [`run()`].
pub fn error_kind( error: &anyhow::Error ) -> &'static str {
	if let Some( err ) = error.downcast_ref::<ConfigError>() { return err.kind() }
	if let Some( err ) = error.downcast_ref::<LoadError>() { return err.kind() }
	if error.downcast_ref::<std::io::Error>().is_some() { return "IoError" }
	"Error"
}

fn exit_code( status: i64 ) -> ExitCode { ExitCode::from( status_byte( status ))}

/// The status reduced modulo 256, as the process exit code.
fn status_byte( status: i64 ) -> u8 {
	u8::try_from( status.rem_euclid( 256 )).unwrap_or( u8::MAX )
}
