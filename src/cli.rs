//! The `task-runner` command line.
//!
//! | Invocation | Effect |
//! |------------|--------|
//! | `--list` | lists unit files in the plugin directory |
//! | `--where NAME` | prints where `NAME` would be imported from |
//! | `--resolvers` | prints the resolver chain in order |
//! | `run TARGET [--reload] [-- ARGS...]` | loads `TARGET` and calls its `main` |
//!
//! Call [`run()`] to parse the process arguments and execute them.

mod app ;
mod logging ;

pub use app::{ error_kind, run, Cli, Commands };
pub use logging::{ filter_directives, init_logging };
