use std::sync::Arc ;
use wasm_import::{ invoke, Descriptor, FnResolver, InvokeError, LogicalName, NativeSource };

#[test]
fn custom_resolver_end_to_end() {

    let importer = crate::fixtures::importer();
    let source = NativeSource::new(| unit | {
        unit.set( "VALUE", 123 );
        Ok(())
    });
    importer.register_front( Arc::new( FnResolver::new( "synthetic", move | name: &LogicalName |
        Ok(( name.as_str() == "synthetic" ).then(|| Descriptor::new( name.clone(), "synthetic", source.clone().into() )))
    )));

    let descriptor = importer.resolve( &"synthetic".into() ).expect( "synthetic should resolve" );
    assert_eq!( descriptor.origin(), "synthetic" );

    let unit = importer.load( descriptor ).expect( "synthetic should load" );
    assert_eq!( unit.get( "VALUE" ).and_then(| value | value.as_int() ), Some( 123 ));
    assert_eq!( unit.origin_path(), None );

    match invoke( &unit, &[] ) {
        Err( InvokeError::MissingEntryPoint( name )) if name.as_str() == "synthetic" => {}
        other => panic!( "Expected MissingEntryPoint, got: {:#?}", other ),
    }

}
