use wasm_import::{ invoke, Descriptor, ExecutionError, InvokeError, NativeFunction, Value };

#[test]
fn trap_in_main_is_an_execution_error() {
    let unit = crate::fixtures::importer().import( &"trap_main".into() ).expect( "import failed" );
    match invoke( &unit, &[] ) {
        Err( InvokeError::Execution( ExecutionError::Trap( _ ))) => {}
        other => panic!( "Expected Trap, got: {:#?}", other ),
    }
}

#[test]
fn unsupported_signature_is_not_retried() {
    let unit = crate::fixtures::importer().import( &"bad_signature".into() ).expect( "import failed" );
    match invoke( &unit, &crate::fixtures::args( &[ "x" ])) {
        Err( InvokeError::Execution( ExecutionError::UnsupportedSignature { name, params: 2 })) => assert_eq!( name, "main" ),
        other => panic!( "Expected UnsupportedSignature, got: {:#?}", other ),
    }
}

#[test]
fn native_errors_are_raised() {
    let unit = crate::fixtures::importer().load( Descriptor::native( "failing".into(), "test", | unit | {
        unit.set( "main", NativeFunction::with_args(| args | match args {
            [] => Ok( Value::Int( 0 )),
            _ => Err( "unexpected arguments".into() ),
        }));
        Ok(())
    })).expect( "load failed" );

    match invoke( &unit, &crate::fixtures::args( &[ "x" ])) {
        Err( InvokeError::Execution( ExecutionError::Raised( error ))) => assert_eq!( error.to_string(), "unexpected arguments" ),
        other => panic!( "Expected Raised, got: {:#?}", other ),
    }
}

#[test]
fn non_callable_main_is_rejected() {
    let unit = crate::fixtures::importer().load( Descriptor::native( "data".into(), "test", | unit | {
        unit.set( "main", 1 );
        Ok(())
    })).expect( "load failed" );

    match invoke( &unit, &[] ) {
        Err( InvokeError::Execution( ExecutionError::NotCallable( _ ))) => {}
        other => panic!( "Expected NotCallable, got: {:#?}", other ),
    }
}

#[test]
fn invocation_cannot_rebind_attributes() {
    let importer = crate::fixtures::importer();
    let unit = importer.import( &"late_binding".into() ).expect( "import failed" );
    let attributes = unit.attribute_names();
    assert_eq!( attributes, vec![ "VALUE", "main" ]);

    match invoke( &unit, &[] ) {
        Err( InvokeError::Execution( ExecutionError::Trap( _ ))) => {}
        other => panic!( "Expected Trap, got: {:#?}", other ),
    }

    let cached = importer.cache().get( unit.name() ).expect( "unit should be cached" );
    assert_eq!( cached.attribute_names(), attributes );
    assert!( cached.get( "HACK" ).is_none() );
    assert_eq!( cached.get( "VALUE" ).and_then(| value | value.as_int() ), Some( 1 ));
}
