use wasm_import::list_plugins ;

#[test]
fn fixture_plugins_are_listed_in_order() {
    let plugins = list_plugins( &crate::fixtures::plugin_dir(), &crate::fixtures::extensions(), "_" );
    let names = plugins.iter().map(| info | info.name.as_str() ).collect::<Vec<_>>();
    assert_eq!( names, vec![ "hello", "seven", "wrap" ]);
    assert_eq!( plugins[0].origin, crate::fixtures::plugin_dir().join( "hello.wat" ).display().to_string() );
}

#[test]
fn private_files_are_excluded() {
    let dir = tempfile::tempdir().unwrap();
    for file in [ "_private.ext", "b.ext", "a.ext" ] {
        std::fs::write( dir.path().join( file ), "" ).unwrap();
    }
    let plugins = list_plugins( dir.path(), &[ "ext".to_string() ], "_" );
    let names = plugins.iter().map(| info | info.name.as_str() ).collect::<Vec<_>>();
    assert_eq!( names, vec![ "a", "b" ]);
}

#[test]
fn nonexistent_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!( list_plugins( &dir.path().join( "missing" ), &crate::fixtures::extensions(), "_" ), vec![]);
}
