use std::process::ExitCode ;

fn main() -> ExitCode {
	match wasm_import::cli::run() {
		Ok( code ) => code,
		Err( err ) => {
			eprintln!( "[error] {}: {:#}", wasm_import::cli::error_kind( &err ), err );
			ExitCode::FAILURE
		},
	}
}
