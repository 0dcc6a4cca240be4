use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use wasm_import::{ Descriptor, FnResolver, LogicalName, NativeSource };

#[test]
fn second_import_returns_the_cached_unit() {
    let importer = crate::fixtures::importer();
    let name = LogicalName::from( "attributes" );

    let first = importer.import( &name ).expect( "first import failed" );
    let second = importer.import( &name ).expect( "second import failed" );
    assert!( Arc::ptr_eq( &first, &second ));

    let reloaded = importer.reload( &first ).expect( "reload failed" );
    assert!( !Arc::ptr_eq( &first, &reloaded ));
    assert_eq!( reloaded.name(), first.name() );

    let third = importer.import( &name ).expect( "third import failed" );
    assert!( Arc::ptr_eq( &third, &reloaded ));
}

#[test]
fn loading_the_same_descriptor_twice_reuses_the_unit() {
    let importer = crate::fixtures::importer();
    let descriptor = Descriptor::file( "seven".into(), crate::fixtures::plugin_dir().join( "seven.wat" ));
    let first = importer.load( descriptor.clone() ).expect( "first load failed" );
    let second = importer.load( descriptor ).expect( "second load failed" );
    assert!( Arc::ptr_eq( &first, &second ));
}

#[test]
fn content_runs_once_per_load() {

    let runs = Arc::new( AtomicUsize::new( 0 ));
    let source = {
        let runs = Arc::clone( &runs );
        NativeSource::new( move | unit | {
            unit.set( "RUN", i64::try_from( runs.fetch_add( 1, Ordering::SeqCst ) + 1 )?);
            Ok(())
        })
    };

    let importer = crate::fixtures::importer();
    importer.register_front( Arc::new( FnResolver::new( "counting", move | name: &LogicalName |
        Ok(( name.as_str() == "counted" ).then(|| Descriptor::new( name.clone(), "counting", source.clone().into() )))
    )));

    let unit = importer.import( &"counted".into() ).expect( "import failed" );
    importer.import( &"counted".into() ).expect( "import failed" );
    assert_eq!( runs.load( Ordering::SeqCst ), 1 );

    let reloaded = importer.reload( &unit ).expect( "reload failed" );
    assert_eq!( runs.load( Ordering::SeqCst ), 2 );
    assert_eq!( unit.get( "RUN" ).and_then(| value | value.as_int() ), Some( 1 ));
    assert_eq!( reloaded.get( "RUN" ).and_then(| value | value.as_int() ), Some( 2 ));

}
