use std::sync::Arc ;
use wasm_import::{ invoke, InvokeError };

#[test]
fn unit_without_main_is_not_invocable() {
    let importer = crate::fixtures::importer();
    let unit = importer.import( &"attributes".into() ).expect( "import failed" );
    let names = importer.cache().names();
    let attributes = unit.attribute_names();

    match invoke( &unit, &crate::fixtures::args( &[ "x" ])) {
        Err( error @ InvokeError::MissingEntryPoint( _ )) => assert_eq!( error.kind(), "MissingEntryPointError" ),
        other => panic!( "Expected MissingEntryPoint, got: {:#?}", other ),
    }

    assert_eq!( importer.cache().names(), names );
    assert_eq!( unit.attribute_names(), attributes );
    assert!( Arc::ptr_eq( &importer.cache().get( unit.name() ).unwrap(), &unit ));
}
