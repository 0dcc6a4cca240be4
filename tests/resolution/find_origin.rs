use wasm_import::{ LogicalName, ResolutionError };

#[test]
fn origins_come_from_the_chain() {
    let importer = crate::fixtures::importer();
    assert_eq!( importer.find_origin( &"echo".into() ), Ok( Some( "builtin".to_string() )));
    assert_eq!(
        importer.find_origin( &"attributes".into() ),
        Ok( Some( format!( "file:{}", crate::fixtures::path( "attributes.wat" ).display() ))),
    );
    assert_eq!( importer.find_origin( &"json".into() ), Ok( None ));
}

#[test]
fn cached_units_report_their_own_origin() {
    let importer = crate::fixtures::importer();
    let name = LogicalName::from( "renamed" );
    importer.load_file( name.clone(), crate::fixtures::path( "attributes.wat" )).expect( "attributes should load" );
    assert_eq!( importer.cache().origin( &name ), Some( format!( "file:{}", crate::fixtures::path( "attributes.wat" ).display() )));
    assert_eq!( importer.find_origin( &name ), Ok( importer.cache().origin( &name )));
}

#[test]
fn malformed_names_are_errors() {
    assert_eq!(
        crate::fixtures::importer().find_origin( &"a/b".into() ),
        Err( ResolutionError::InvalidName( "a/b".to_string() )),
    );
}
