use std::sync::{ Arc, Mutex };
use wasm_import::{ invoke, Descriptor, NativeFunction, Value };

#[test]
fn one_argument_entry_point_gets_the_arguments() {
    let received = Arc::new( Mutex::new( Vec::<String>::new() ));
    let recorder = Arc::clone( &received );
    let unit = crate::fixtures::importer().load( Descriptor::native( "recorder".into(), "test", move | unit | {
        let recorder = Arc::clone( &recorder );
        unit.set( "main", NativeFunction::with_args( move | args | {
            recorder.lock().unwrap().extend_from_slice( args );
            Ok( Value::Int( 0 ))
        }));
        Ok(())
    })).expect( "load failed" );

    assert_eq!( invoke( &unit, &crate::fixtures::args( &[ "x", "y" ])).expect( "invoke failed" ), 0 );
    assert_eq!( *received.lock().unwrap(), vec![ "x", "y" ]);
}

#[test]
fn zero_argument_entry_point_ignores_the_arguments() {
    let unit = crate::fixtures::importer().load( Descriptor::native( "nullary".into(), "test", | unit | {
        unit.set( "main", NativeFunction::no_args(|| Ok( Value::Int( 5 ))));
        Ok(())
    })).expect( "load failed" );

    assert_eq!( invoke( &unit, &crate::fixtures::args( &[ "x", "y" ])).expect( "invoke failed" ), 5 );
}

#[test]
fn wasm_entry_point_with_argc_reads_the_arguments() {
    let unit = crate::fixtures::importer().import( &"hello".into() ).expect( "import failed" );
    assert_eq!( invoke( &unit, &crate::fixtures::args( &[ "x", "y" ])).expect( "invoke failed" ), 2 );
    assert_eq!( invoke( &unit, &[] ).expect( "invoke failed" ), 0 );
}

#[test]
fn wasm_entry_point_without_parameters_ignores_the_arguments() {
    let unit = crate::fixtures::importer().import( &"seven".into() ).expect( "import failed" );
    assert_eq!( invoke( &unit, &crate::fixtures::args( &[ "x", "y" ])).expect( "invoke failed" ), 7 );
}
