use wasm_import::{ ExecutionError, ImportError, LoadError, LogicalName };

#[test]
fn missing_file_is_not_found() {
    let importer = crate::fixtures::importer();
    let error = importer.load_file( "gone".into(), crate::fixtures::path( "gone.wat" )).expect_err( "load should fail" );
    assert_eq!( error.kind(), "LoadError" );
    assert!( matches!( error, ImportError::Load { source: LoadError::NotFound( _ ), .. }));
}

#[test]
fn invalid_module_fails_to_compile() {
    match crate::fixtures::importer().import( &"broken".into() ) {
        Err( ImportError::Load { name, source: LoadError::Compile { path, .. }}) => {
            assert_eq!( name, LogicalName::from( "broken" ));
            assert_eq!( path, crate::fixtures::path( "broken.wat" ));
        }
        other => panic!( "Expected a compile error, got: {:#?}", other ),
    }
}

#[test]
fn init_with_parameters_is_rejected() {
    match crate::fixtures::importer().import( &"invalid_init".into() ) {
        Err( error @ ImportError::Execution { source: ExecutionError::InvalidInit( _ ), .. }) => {
            assert_eq!( error.kind(), "ExecutionError" );
        }
        other => panic!( "Expected InvalidInit, got: {:#?}", other ),
    }
}
