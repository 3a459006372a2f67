/* Header emission tests
 *
 * Module descriptions are loaded from YAML and printed in both dialects. The
 * assertions check ordering, imports, forward declarations and how
 * dependency cycles are broken.
 */

use hdr_gen::{
    EmitError, EmitOptions, InteropContext, ModuleWriter, SyntaxPrinter,
    print_module_contents_cxx, print_module_contents_objc,
};
use hdr_loader::{ModuleLoader, parse_module_file};
use hdr_types::{AccessLevel, DeclKind, ModuleGraph, ModuleId, ModuleKind};

/* Foreign module with a constrained generic class: arguments of Bag need a full definition */
const KIT: &str = r#"
module: Kit
kind: foreign
declarations:
  - name: NSObject
    kind: class
    access: public
    objc: true
    foreign:
      module: Kit
  - name: Hashing
    kind: protocol
    access: public
    objc: true
    foreign:
      module: Kit
  - name: Bag
    kind: class
    access: public
    objc: true
    foreign:
      module: Kit
    generic-params:
      - name: Element
        class-bound: true
        protocols: [Hashing]
  - name: List
    kind: class
    access: public
    objc: true
    foreign:
      module: Kit
    generic-params:
      - name: Element
        class-bound: true
  - name: Color
    kind: class
    access: public
    objc: true
    foreign:
      module: Kit
      class-kind: cf-type
"#;

fn build(files: &[&str]) -> ModuleGraph {
    let mut loader = ModuleLoader::new();
    for file in files {
        loader
            .add_module_file(parse_module_file(file).unwrap())
            .unwrap();
    }
    loader.build().unwrap()
}

fn module(graph: &ModuleGraph, name: &str) -> ModuleId {
    graph.find_module(name).unwrap()
}

fn objc_text(graph: &ModuleGraph, name: &str) -> String {
    print_module_contents_objc(graph, module(graph, name), AccessLevel::Public)
        .unwrap()
        .text
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, text))
}

#[test]
fn test_emission_is_deterministic() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Keeper
    kind: class
    access: public
    objc: true
    superclass: Kit.NSObject
    members:
      - name: animals
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.List
            args:
              - nominal: Animal
  - name: Animal
    kind: class
    access: public
    objc: true
    superclass: Kit.NSObject
"#;
    let graph = build(&[KIT, zoo]);
    let zoo = module(&graph, "Zoo");

    let first = print_module_contents_objc(&graph, zoo, AccessLevel::Public).unwrap();
    let second = print_module_contents_objc(&graph, zoo, AccessLevel::Public).unwrap();
    assert_eq!(first, second);

    let mut interop = InteropContext::new();
    let first = print_module_contents_cxx(&graph, zoo, false, &mut interop).unwrap();
    let mut interop = InteropContext::new();
    let second = print_module_contents_cxx(&graph, zoo, false, &mut interop).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_top_level_declarations_are_sorted_by_name() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Cherry
    kind: class
    access: public
    objc: true
  - name: Apple
    kind: class
    access: public
    objc: true
  - name: Banana
    kind: class
    access: public
    objc: true
"#;
    let graph = build(&[zoo]);
    let text = objc_text(&graph, "Zoo");

    let apple = position(&text, "@interface Apple");
    let banana = position(&text, "@interface Banana");
    let cherry = position(&text, "@interface Cherry");
    assert!(apple < banana && banana < cherry);
}

#[test]
fn test_smaller_extension_is_printed_first() {
    let zoo = r#"
module: Zoo
declarations:
  - kind: extension
    extends: Cage
    members:
      - { name: paint, kind: function, access: public, objc: true }
      - { name: sweep, kind: function, access: public, objc: true }
      - { name: lock, kind: function, access: public, objc: true }
  - kind: extension
    extends: Cage
    members:
      - { name: open, kind: function, access: public, objc: true }
  - name: Cage
    kind: class
    access: public
    objc: true
"#;
    let graph = build(&[zoo]);
    let text = objc_text(&graph, "Zoo");

    let class = position(&text, "@interface Cage\n");
    let small = position(&text, "- (void)open;");
    let large = position(&text, "- (void)paint;");
    assert!(class < small && small < large);
    assert_eq!(text.matches("@interface Cage (HDR_EXTENSION(Zoo))").count(), 2);
}

#[test]
fn test_import_set_holds_each_module_once() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Animal
    kind: class
    access: public
    objc: true
    superclass: Kit.NSObject
    members:
      - name: friends
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.List
            args:
              - nominal: Animal
      - name: rivals
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.List
            args:
              - nominal: Kit.NSObject
"#;
    let graph = build(&[KIT, zoo]);
    let kit = module(&graph, "Kit");
    let output =
        print_module_contents_objc(&graph, module(&graph, "Zoo"), AccessLevel::Public).unwrap();

    assert_eq!(output.imports.iter().copied().collect::<Vec<_>>(), vec![kit]);
}

#[test]
fn test_reference_members_only_need_forward_declarations() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Alpha
    kind: class
    access: public
    objc: true
    members:
      - name: buddy
        kind: var
        access: public
        objc: true
        type:
          nominal: Beta
  - name: Beta
    kind: class
    access: public
    objc: true
"#;
    let graph = build(&[zoo]);
    let zoo = module(&graph, "Zoo");
    let options = EmitOptions::objc(AccessLevel::Public);
    let printer = SyntaxPrinter::new(&graph, zoo, options);
    let written = ModuleWriter::new(&graph, zoo, printer, options)
        .write()
        .unwrap();

    assert!(written.delayed.is_empty());
    let forward = position(&written.text, "@class Beta;");
    let alpha = position(&written.text, "@interface Alpha");
    let beta = position(&written.text, "@interface Beta");
    assert!(forward < alpha && alpha < beta);
    assert!(written.text.contains("@property (nonatomic, strong) Beta * _Nonnull buddy;"));
    assert_eq!(written.text.matches("@interface Beta").count(), 1);
}

#[test]
fn test_class_cycle_delays_one_member() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Alpha
    kind: class
    access: public
    objc: true
    members:
      - name: partner
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.Bag
            args:
              - nominal: Beta
  - name: Beta
    kind: class
    access: public
    objc: true
    members:
      - name: owner
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.Bag
            args:
              - nominal: Alpha
"#;
    let graph = build(&[KIT, zoo]);
    let zoo = module(&graph, "Zoo");
    let options = EmitOptions::objc(AccessLevel::Public);
    let printer = SyntaxPrinter::new(&graph, zoo, options);
    let written = ModuleWriter::new(&graph, zoo, printer, options)
        .write()
        .unwrap();

    let alpha = graph.find_top_level(zoo, "Alpha").unwrap();
    assert_eq!(written.delayed, vec![graph.decl(alpha).members[0]]);

    let text = &written.text;
    assert_eq!(text.matches("partner;").count(), 1);
    assert_eq!(text.matches("owner;").count(), 1);
    let beta = position(text, "@interface Beta");
    let batch = position(text, "@interface Alpha (HDR_EXTENSION(Zoo))");
    assert!(beta < batch);
    assert!(batch < position(text, "partner;"));
}

#[test]
fn test_protocol_cycle_falls_back_to_forward_declaration() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Pilot
    kind: protocol
    access: public
    objc: true
    members:
      - name: plane
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.Bag
            args:
              - nominal: Plane
  - name: Plane
    kind: protocol
    access: public
    objc: true
    members:
      - name: pilot
        kind: var
        access: public
        objc: true
        type:
          generic:
            decl: Kit.Bag
            args:
              - nominal: Pilot
"#;
    let graph = build(&[KIT, zoo]);
    let text = objc_text(&graph, "Zoo");

    assert_eq!(text.matches("HDR_PROTOCOL(\"Zoo.Pilot\")").count(), 1);
    assert_eq!(text.matches("HDR_PROTOCOL(\"Zoo.Plane\")").count(), 1);
    assert!(text.contains("@protocol Plane;\n"));
}

/* Px is needed both by the conforming declaration and by Py, which inherits it */
const LAYERED_PROTOCOLS: &str = r#"
  - name: Px
    kind: protocol
    access: public
    objc: true
  - name: Py
    kind: protocol
    access: public
    objc: true
    protocols: [Px]
"#;

#[test]
fn test_shared_prerequisite_is_defined_before_both_dependents() {
    let zoo = format!(
        r#"
module: Zoo
declarations:
  - name: Alpha
    kind: class
    access: public
    objc: true
    protocols: [Px, Py]
{}"#,
        LAYERED_PROTOCOLS
    );
    let graph = build(&[zoo.as_str()]);
    let text = objc_text(&graph, "Zoo");

    let px = position(&text, "HDR_PROTOCOL(\"Zoo.Px\")");
    let py = position(&text, "HDR_PROTOCOL(\"Zoo.Py\")");
    let alpha = position(&text, "@interface Alpha <Px, Py>");
    assert!(px < py && py < alpha);
    assert!(!text.contains("@protocol Px;"));
    assert_eq!(text.matches("HDR_PROTOCOL(\"Zoo.Px\")").count(), 1);
}

#[test]
fn test_extension_conformances_are_defined_before_the_extension() {
    let zoo = format!(
        r#"
module: Zoo
declarations:
  - name: Cage
    kind: class
    access: public
    objc: true
  - kind: extension
    extends: Cage
    protocols: [Px, Py]
{}"#,
        LAYERED_PROTOCOLS
    );
    let graph = build(&[zoo.as_str()]);
    let text = objc_text(&graph, "Zoo");

    let px = position(&text, "HDR_PROTOCOL(\"Zoo.Px\")");
    let py = position(&text, "HDR_PROTOCOL(\"Zoo.Py\")");
    let ext = position(&text, "@interface Cage (HDR_EXTENSION(Zoo)) <Px, Py>");
    assert!(px < py && py < ext);
    assert!(!text.contains("@protocol Px;"));
}

#[test]
fn test_superclass_cycle_terminates() {
    let mut graph = ModuleGraph::new();
    let zoo = graph.add_module("Zoo", ModuleKind::Source);
    let hen = graph.add_top_level(DeclKind::Class, "Hen", zoo);
    let egg = graph.add_top_level(DeclKind::Class, "Egg", zoo);
    for (id, superclass) in [(hen, egg), (egg, hen)] {
        let decl = graph.decl_mut(id);
        decl.access = AccessLevel::Public;
        decl.attrs.objc = true;
        decl.superclass = Some(superclass);
    }

    let text = objc_text(&graph, "Zoo");
    assert_eq!(text.matches("@interface Egg").count(), 1);
    assert_eq!(text.matches("@interface Hen").count(), 1);
}

#[test]
fn test_duplicate_top_level_names_are_fatal() {
    let mut graph = ModuleGraph::new();
    let zoo = graph.add_module("Zoo", ModuleKind::Source);
    for kind in [DeclKind::Class, DeclKind::Protocol] {
        let id = graph.add_top_level(kind, "Cage", zoo);
        graph.decl_mut(id).access = AccessLevel::Public;
        graph.decl_mut(id).attrs.objc = true;
    }

    let err = print_module_contents_objc(&graph, zoo, AccessLevel::Public).unwrap_err();
    assert_eq!(
        err,
        EmitError::DuplicateTopLevelName {
            name: "Cage".to_string()
        }
    );
}

#[test]
fn test_objc_rejects_structs_at_top_level() {
    let mut graph = ModuleGraph::new();
    let zoo = graph.add_module("Zoo", ModuleKind::Source);
    let point = graph.add_top_level(DeclKind::Struct, "Point", zoo);
    graph.decl_mut(point).access = AccessLevel::Public;
    graph.decl_mut(point).attrs.objc = true;

    let err = print_module_contents_objc(&graph, zoo, AccessLevel::Public).unwrap_err();
    assert!(matches!(err, EmitError::UnexpectedTopLevelDecl { .. }));
}

#[test]
fn test_cf_types_are_imported_not_forward_declared() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Canvas
    kind: class
    access: public
    objc: true
    members:
      - name: tint
        kind: var
        access: public
        objc: true
        type:
          nominal: Kit.Color
"#;
    let graph = build(&[KIT, zoo]);
    let output =
        print_module_contents_objc(&graph, module(&graph, "Zoo"), AccessLevel::Public).unwrap();

    assert!(!output.text.contains("@class Color;"));
    assert!(output.imports.contains(&module(&graph, "Kit")));
}

#[test]
fn test_error_enum_gets_domain_constant() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Failure
    kind: enum
    access: public
    objc: true
    error-type: true
    raw-type:
      builtin: Int
    members:
      - { name: notFound, kind: enum-case, access: public, objc: true }
      - { name: denied, kind: enum-case, access: public, objc: true }
  - name: Fault
    kind: enum
    access: public
    objc: true
    error-type: true
    members:
      - { name: Domain, kind: enum-case, access: public, objc: true }
"#;
    let graph = build(&[zoo]);
    let text = objc_text(&graph, "Zoo");

    assert!(text.contains("typedef HDR_ENUM(NSInteger, Failure, closed) {\n  FailureNotFound = 0,\n  FailureDenied = 1,\n};\n"));
    assert!(text.contains("static NSString * _Nonnull const FailureDomain = @\"Zoo.Failure\";"));
    assert!(!text.contains("const FaultDomain"));
}

#[test]
fn test_explicit_nested_types_follow_their_container() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Zebra
    kind: class
    access: public
    objc: true
  - name: Outer
    kind: class
    access: public
    objc: true
    members:
      - name: Inner
        kind: class
        access: public
        explicit-objc: true
      - name: Hidden
        kind: class
        access: public
        objc: true
"#;
    let graph = build(&[zoo]);
    let text = objc_text(&graph, "Zoo");

    let outer = position(&text, "@interface Outer");
    let inner = position(&text, "@interface Inner");
    let zebra = position(&text, "@interface Zebra");
    assert!(outer < inner && inner < zebra);
    assert!(!text.contains("@interface Hidden"));
}

#[test]
fn test_cxx_wraps_module_in_namespace_and_prints_core_once() {
    let zoo = r#"
module: Zoo
declarations:
  - name: makePoint
    kind: function
    access: public
    type:
      function:
        params: []
        result:
          nominal: Point
  - name: Point
    kind: struct
    access: public
    members:
      - name: x
        kind: var
        access: public
        type:
          builtin: Int
"#;
    let aquarium = r#"
module: Aquarium
declarations:
  - name: Tank
    kind: class
    access: public
"#;
    let graph = build(&[zoo, aquarium]);
    let mut interop = InteropContext::new();

    let first = print_module_contents_cxx(&graph, module(&graph, "Zoo"), false, &mut interop).unwrap();
    assert!(first.shared_scaffold_needed);
    assert!(first.text.starts_with("#ifndef HDR_PRINTED_CORE\n#define HDR_PRINTED_CORE\n"));
    assert!(first.text.contains("namespace _impl {\nextern \"C\" {"));
    assert!(first.text.contains("HDR_EXTERN ptrdiff_t Zoo_Point_x(void * _Nonnull self)"));
    assert!(first.text.contains("namespace Zoo HDR_PRIVATE_ATTR {\n"));
    assert!(first.text.trim_end().ends_with("} // namespace Zoo"));

    let forward = position(&first.text, "class Point;");
    let definition = position(&first.text, "class HDR_SYMBOL(\"Zoo.Point\") Point final");
    let function = position(&first.text, "inline Point makePoint()");
    assert!(forward < definition && definition < function);
    assert_eq!(first.text.matches("class Point;").count(), 1);

    let second =
        print_module_contents_cxx(&graph, module(&graph, "Aquarium"), false, &mut interop).unwrap();
    assert!(!second.shared_scaffold_needed);
    assert!(!second.text.contains("HDR_PRINTED_CORE"));
    assert!(second.text.contains("namespace Aquarium HDR_PRIVATE_ATTR {"));
}

#[test]
fn test_cxx_delayed_members_are_defined_after_value_types() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Alpha
    kind: class
    access: public
    members:
      - name: beta
        kind: var
        access: public
        type:
          nominal: Beta
  - name: Beta
    kind: struct
    access: public
"#;
    let graph = build(&[zoo]);
    let zoo = module(&graph, "Zoo");
    let options = EmitOptions::cxx(false);
    let printer = SyntaxPrinter::new(&graph, zoo, options);
    let written = ModuleWriter::new(&graph, zoo, printer, options)
        .write()
        .unwrap();

    assert_eq!(written.delayed.len(), 1);
    let text = &written.text;
    assert!(text.contains("  Beta getBeta() const;\n"));
    let beta = position(text, "class HDR_SYMBOL(\"Zoo.Beta\") Beta final");
    let definition = position(text, "inline Beta Alpha::getBeta() const");
    assert!(beta < definition);
    assert_eq!(text.matches("Alpha::getBeta()").count(), 1);
}

#[test]
fn test_cxx_struct_extensions_print_inside_the_struct() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Point
    kind: struct
    access: public
  - kind: extension
    extends: Point
    access: public
    members:
      - name: length
        kind: function
        access: public
        type:
          function:
            params: []
            result:
              builtin: Double
"#;
    let graph = build(&[zoo]);
    let mut interop = InteropContext::new();
    let zoo = module(&graph, "Zoo");
    let output = print_module_contents_cxx(&graph, zoo, false, &mut interop).unwrap();

    let point = graph.find_top_level(zoo, "Point").unwrap();
    assert_eq!(interop.extensions_for(point).len(), 1);
    let body = position(&output.text, "class HDR_SYMBOL(\"Zoo.Point\") Point final");
    let member = position(&output.text, "  double length() const;");
    assert!(body < member);
}

#[test]
fn test_cxx_reports_standard_library_use_without_importing_it() {
    let std = r#"
module: Std
kind: stdlib
declarations:
  - name: Array
    kind: struct
    access: public
"#;
    let zoo = r#"
module: Zoo
declarations:
  - name: count
    kind: function
    access: public
    type:
      function:
        params:
          - nominal: Std.Array
        result:
          builtin: Int
"#;
    let graph = build(&[std, zoo]);
    let mut interop = InteropContext::new();
    let output = print_module_contents_cxx(&graph, module(&graph, "Zoo"), false, &mut interop).unwrap();

    assert!(output.depends_on_standard_library);
    assert!(output.imports.is_empty());
    assert!(output.text.contains("inline ptrdiff_t count(hdr::Array arg0)"));
}

#[test]
fn test_cxx_requires_exposed_attribute_when_asked() {
    let zoo = r#"
module: Zoo
declarations:
  - name: Visible
    kind: struct
    access: public
    exposed: true
  - name: Quiet
    kind: struct
    access: public
"#;
    let graph = build(&[zoo]);
    let zoo = module(&graph, "Zoo");

    let mut interop = InteropContext::new();
    let gated = print_module_contents_cxx(&graph, zoo, true, &mut interop).unwrap();
    assert!(gated.text.contains("Visible final"));
    assert!(!gated.text.contains("Quiet"));

    let mut interop = InteropContext::new();
    let open = print_module_contents_cxx(&graph, zoo, false, &mut interop).unwrap();
    assert!(open.text.contains("Quiet final"));
}
