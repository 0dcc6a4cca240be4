use std::sync::Arc ;
use wasm_import::{ CachePolicy, ExecutionError, ImportError, LoadError, LogicalName };

fn load_trapping( policy: CachePolicy ) -> ( wasm_import::Importer, LogicalName ) {
    let importer = crate::fixtures::importer_with( policy, None );
    let name = LogicalName::from( "trap_init" );
    match importer.import( &name ) {
        Err( ImportError::Execution { source: ExecutionError::Trap( _ ), .. }) => {}
        other => panic!( "Expected a trap during _init, got: {:#?}", other ),
    }
    ( importer, name )
}

#[test]
fn eager_policy_keeps_the_partial_unit() {
    let ( importer, name ) = load_trapping( CachePolicy::Eager );
    let partial = importer.cache().get( &name ).expect( "partial unit should be cached" );
    assert_eq!( partial.get( "VALUE" ).and_then(| value | value.as_int() ), Some( 1 ));
    assert!( Arc::ptr_eq( &partial, &importer.import( &name ).expect( "cached import failed" )));
}

#[test]
fn on_success_policy_leaves_no_entry() {
    let ( importer, name ) = load_trapping( CachePolicy::OnSuccess );
    assert!( !importer.cache().contains( &name ));
    assert!( importer.cache().is_empty() );
}

#[test]
fn load_errors_leave_the_cache_untouched() {
    for policy in [ CachePolicy::Eager, CachePolicy::OnSuccess ] {
        let importer = crate::fixtures::importer_with( policy, None );
        let name = LogicalName::from( "slot" );
        let previous = importer.load_file( name.clone(), crate::fixtures::path( "attributes.wat" )).expect( "load failed" );

        match importer.load_file( name.clone(), crate::fixtures::path( "broken.wat" )) {
            Err( ImportError::Load { source: LoadError::Compile { .. }, .. }) => {}
            other => panic!( "Expected a compile error, got: {:#?}", other ),
        }
        match importer.load_file( name.clone(), crate::fixtures::path( "absent.wat" )) {
            Err( ImportError::Load { source: LoadError::NotFound( _ ), .. }) => {}
            other => panic!( "Expected NotFound, got: {:#?}", other ),
        }

        assert!( Arc::ptr_eq( &importer.cache().get( &name ).unwrap(), &previous ));
    }
}
