use std::sync::Arc ;
use wasm_import::{ Descriptor, FnResolver, ImportError, LogicalName, Value };

fn constant( label: &'static str, recognised: &'static str ) -> Arc<FnResolver<impl Fn( &LogicalName ) -> wasm_import::Resolution + Send + Sync>> {
    Arc::new( FnResolver::new( label, move | name: &LogicalName | Ok(( name.as_str() == recognised ).then(||
        Descriptor::native( name.clone(), label, move | unit | {
            unit.set( "FROM", label );
            Ok(())
        })
    ))))
}

#[test]
fn default_chain_order() {
    assert_eq!( crate::fixtures::importer().resolvers(), vec![ "builtin", "search-path" ]);
}

#[test]
fn front_registration_shadows_builtins() {
    let importer = crate::fixtures::importer();
    importer.register_front( constant( "custom", "echo" ));
    assert_eq!( importer.resolvers(), vec![ "custom", "builtin", "search-path" ]);

    let unit = importer.import( &"echo".into() ).expect( "echo should import" );
    assert_eq!( unit.origin(), "custom" );
    match unit.get( "FROM" ) {
        Some( Value::Str( from )) if from == "custom" => {}
        other => panic!( "Expected FROM = \"custom\", got: {:#?}", other ),
    }
}

#[test]
fn back_registration_only_sees_declined_names() {
    let importer = crate::fixtures::importer();
    importer.register_back( constant( "fallback", "echo" ));
    importer.register_back( constant( "fallback", "json" ));
    assert_eq!( importer.resolvers(), vec![ "builtin", "search-path", "fallback", "fallback" ]);

    assert_eq!( importer.import( &"echo".into() ).expect( "echo should import" ).origin(), "builtin" );
    assert_eq!( importer.import( &"json".into() ).expect( "json should import" ).origin(), "fallback" );
}

#[test]
fn whole_chain_declining_is_not_found() {
    match crate::fixtures::importer().import( &"json".into() ) {
        Err( ImportError::NotFound( name )) if name.as_str() == "json" => {}
        other => panic!( "Expected NotFound, got: {:#?}", other ),
    }
}
