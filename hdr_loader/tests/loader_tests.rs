/* Module loader tests
 *
 * These tests load YAML module descriptions and check that name-based
 * references are linked into the module graph.
 */

use hdr_loader::{ModuleLoader, parse_module_file};
use hdr_types::{DeclKind, ForeignClassKind, ModuleKind, TypeExpr};
use std::fs;

const FOUNDATION: &str = r#"
module: Foundation
kind: foreign
declarations:
  - name: NSObject
    kind: class
    access: public
    objc: true
    foreign:
      module: Foundation
  - name: NSArray
    kind: class
    access: public
    objc: true
    foreign:
      module: Foundation
    generic-params:
      - name: Element
        class-bound: true
"#;

const ZOO: &str = r#"
module: Zoo
externally-consumed: true
declarations:
  - name: Animal
    kind: class
    access: public
    objc: true
    superclass: Foundation.NSObject
    members:
      - name: friends
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Foundation.NSArray
            args:
              - nominal: Animal
      - name: Den
        kind: class
        access: public
        objc: true
  - name: Keeper
    kind: protocol
    access: public
    objc: true
  - kind: extension
    extends: Animal
    protocols: [Keeper]
"#;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_and_link_modules() {
    let dir = tempfile::tempdir().unwrap();
    let foundation = write_file(&dir, "foundation.yaml", FOUNDATION);
    let zoo = write_file(&dir, "zoo.yaml", ZOO);

    let mut loader = ModuleLoader::new();
    loader.load_file(&foundation).unwrap();
    loader.load_file(&zoo).unwrap();
    let graph = loader.build().unwrap();

    let zoo_id = graph.find_module("Zoo").unwrap();
    let foundation_id = graph.find_module("Foundation").unwrap();
    assert!(graph.module(zoo_id).externally_consumed);
    assert_eq!(graph.module(foundation_id).kind, ModuleKind::Foreign);

    let animal = graph.find_top_level(zoo_id, "Animal").unwrap();
    let ns_object = graph.find_top_level(foundation_id, "NSObject").unwrap();
    let ns_array = graph.find_top_level(foundation_id, "NSArray").unwrap();
    assert_eq!(graph.decl(animal).superclass, Some(ns_object));

    let friends = graph.decl(animal).members[0];
    assert_eq!(
        graph.decl(friends).interface_type,
        Some(TypeExpr::BoundGeneric {
            decl: ns_array,
            args: vec![TypeExpr::Nominal(animal)],
        })
    );

    let den = graph.decl(animal).members[1];
    assert_eq!(graph.decl(den).kind, DeclKind::Class);
    assert_eq!(graph.decl(den).parent, Some(animal));

    let array_params = &graph.decl(ns_array).generic_params;
    assert_eq!(array_params.len(), 1);
    assert!(array_params[0].class_bound);
    assert!(!array_params[0].is_constrained());
    assert_eq!(
        graph.decl(ns_array).foreign.as_ref().unwrap().owning_module,
        Some(foundation_id)
    );
    assert_eq!(
        graph.decl(ns_array).foreign_class_kind(),
        ForeignClassKind::Normal
    );
}

#[test]
fn test_extension_links_extended_type_and_protocols() {
    let mut loader = ModuleLoader::new();
    loader
        .add_module_file(parse_module_file(FOUNDATION).unwrap())
        .unwrap();
    loader.add_module_file(parse_module_file(ZOO).unwrap()).unwrap();
    let graph = loader.build().unwrap();

    let zoo_id = graph.find_module("Zoo").unwrap();
    let animal = graph.find_top_level(zoo_id, "Animal").unwrap();
    let keeper = graph.find_top_level(zoo_id, "Keeper").unwrap();
    let extension = graph
        .top_level_decls(zoo_id)
        .iter()
        .copied()
        .find(|id| graph.decl(*id).kind == DeclKind::Extension)
        .unwrap();

    assert_eq!(graph.self_class_decl(extension), Some(animal));
    assert_eq!(graph.decl(extension).protocols, vec![keeper]);
}

#[test]
fn test_loading_same_file_twice_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let foundation = write_file(&dir, "foundation.yaml", FOUNDATION);

    let mut loader = ModuleLoader::new();
    loader.load_file(&foundation).unwrap();
    loader.load_file(&foundation).unwrap();

    assert_eq!(loader.module_names().count(), 1);
}

#[test]
fn test_unknown_reference_is_an_error() {
    let broken = r#"
module: Broken
declarations:
  - name: Orphan
    kind: class
    superclass: Nowhere.Missing
"#;
    let mut loader = ModuleLoader::new();
    loader
        .add_module_file(parse_module_file(broken).unwrap())
        .unwrap();

    let err = loader.build().unwrap_err();
    assert!(err.to_string().contains("Nowhere.Missing"));
}

#[test]
fn test_duplicate_module_is_rejected() {
    let mut loader = ModuleLoader::new();
    loader
        .add_module_file(parse_module_file(FOUNDATION).unwrap())
        .unwrap();
    assert!(
        loader
            .add_module_file(parse_module_file(FOUNDATION).unwrap())
            .is_err()
    );
}

#[test]
fn test_submodule_parent_is_linked() {
    let kit = "module: Kit\nkind: foreign\n";
    let private = "module: Kit.Private\nkind: foreign\nexplicit: false\nparent: Kit\n";

    let mut loader = ModuleLoader::new();
    loader.add_module_file(parse_module_file(kit).unwrap()).unwrap();
    loader
        .add_module_file(parse_module_file(private).unwrap())
        .unwrap();
    let graph = loader.build().unwrap();

    let kit_id = graph.find_module("Kit").unwrap();
    let private_id = graph.find_module("Kit.Private").unwrap();
    assert_eq!(graph.module(private_id).parent, Some(kit_id));
    assert_eq!(graph.nearest_explicit(private_id), Some(kit_id));
}
