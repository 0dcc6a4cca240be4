use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::mpsc ;
use std::time::Duration ;
use once_cell::sync::Lazy ;
use wasm_import::{ CachePolicy, Descriptor, FnResolver, Importer, Loader, LogicalName, NativeSource };

/// Serves `a` and `b`; each pauses, then imports the other.
static CROSSED: Lazy<Importer> = Lazy::new(|| {
    let importer = Importer::new( Loader::new( None ).expect( "failed to create loader" ), CachePolicy::Eager );
    let source = NativeSource::new(| unit | {
        let peer = if unit.name().as_str() == "a" { "b" } else { "a" };
        std::thread::sleep( Duration::from_millis( 200 ));
        let peer = CROSSED.import( &peer.into() )?;
        unit.set( "PEER", peer.name().as_str() );
        Ok(())
    });
    importer.register_front( Arc::new( FnResolver::new( "crossed", move | name: &LogicalName |
        Ok( matches!( name.as_str(), "a" | "b" ).then(|| Descriptor::new( name.clone(), "crossed", source.clone().into() )))
    )));
    importer
});

#[test]
fn concurrent_imports_load_once() {

    let runs = Arc::new( AtomicUsize::new( 0 ));
    let source = {
        let runs = Arc::clone( &runs );
        NativeSource::new( move | unit | {
            runs.fetch_add( 1, Ordering::SeqCst );
            std::thread::sleep( Duration::from_millis( 50 ));
            unit.set( "READY", 1 );
            Ok(())
        })
    };

    let importer = crate::fixtures::importer();
    importer.register_front( Arc::new( FnResolver::new( "slow", move | name: &LogicalName |
        Ok(( name.as_str() == "slow" ).then(|| Descriptor::new( name.clone(), "slow", source.clone().into() )))
    )));

    let units = std::thread::scope(| scope | {
        let handles = ( 0..8 )
            .map(|_| scope.spawn(|| importer.import( &"slow".into() ).expect( "import failed" )))
            .collect::<Vec<_>>();
        handles.into_iter().map(| handle | handle.join().expect( "thread panicked" )).collect::<Vec<_>>()
    });

    assert_eq!( runs.load( Ordering::SeqCst ), 1 );
    assert!( units.iter().all(| unit | Arc::ptr_eq( unit, &units[0] )));
    assert!( units.iter().all(| unit | unit.contains( "READY" )));

}

#[test]
fn distinct_names_load_independently() {
    let importer = crate::fixtures::importer();
    std::thread::scope(| scope | {
        for name in [ "attributes", "seven", "hello", "echo" ] {
            let importer = &importer ;
            scope.spawn( move || importer.import( &name.into() ).expect( "import failed" ));
        }
    });
    assert_eq!( importer.cache().len(), 4 );
}

#[test]
fn crossed_imports_on_two_threads_do_not_deadlock() {
    let ( done, finished ) = mpsc::channel();
    for name in [ "a", "b" ] {
        let done = done.clone();
        std::thread::spawn( move || done.send(( name, CROSSED.import( &name.into() ).map(| unit | unit.get( "PEER" ).and_then(| peer | peer.as_str().map( str::to_string ))))));
    }

    let mut peers = ( 0..2 )
        .map(|_| finished.recv_timeout( Duration::from_secs( 10 )).expect( "import threads are stuck" ))
        .map(| ( name, result ) | ( name, result.expect( "import failed" )))
        .collect::<Vec<_>>();
    peers.sort();
    assert_eq!( peers, vec![ ( "a", Some( "b".to_string() )), ( "b", Some( "a".to_string() )) ]);
}
