use std::sync::Arc ;
use wasm_import::{ FnResolver, ImportError, LogicalName, ResolutionError };

#[test]
fn names_escaping_the_search_path_are_rejected() {
    let importer = crate::fixtures::importer();
    for name in [ "../fixtures/attributes", "plugins/seven", "..", "" ] {
        match importer.import( &name.into() ) {
            Err( ImportError::Resolution( ResolutionError::InvalidName( rejected ))) if rejected == name => {}
            other => panic!( "Expected InvalidName for {:?}, got: {:#?}", name, other ),
        }
    }
}

#[test]
fn an_error_aborts_the_chain() {
    let importer = crate::fixtures::importer();
    importer.register_front( Arc::new( FnResolver::new( "strict", | name: &LogicalName | Err( ResolutionError::Failed {
        resolver: "strict".to_string(),
        name: name.clone(),
        reason: "refusing everything".to_string(),
    }))));

    let error = importer.import( &"echo".into() ).expect_err( "strict resolver should abort" );
    assert_eq!( error.kind(), "ResolutionError" );
    assert!( matches!( error, ImportError::Resolution( ResolutionError::Failed { .. })));
    assert!( importer.cache().is_empty() );
}
