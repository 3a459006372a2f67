//! Top-level candidate filtering and the deterministic emission order.

use crate::dialect::DialectConfig;
use crate::errors::{EmitError, EmitResult};
use crate::printer::DeclPrinter;
use hdr_types::{DeclId, DeclKind, ModuleGraph, ModuleId};
use std::cmp::Ordering;

/// Top-level declarations of `module` that take part in emission, in module order.
pub fn collect_top_level<P: DeclPrinter>(
    graph: &ModuleGraph,
    module: ModuleId,
    printer: &P,
    dialect: &DialectConfig,
) -> Vec<DeclId> {
    graph
        .top_level_decls(module)
        .iter()
        .copied()
        .filter(|decl| {
            let d = graph.decl(*decl);
            if d.kind != DeclKind::Extension {
                return printer.should_include(*decl);
            }
            if dialect.keep_all_extensions {
                return true;
            }
            match graph.self_class_decl(*decl) {
                Some(base) => printer.should_include(base) && !graph.decl(base).is_foreign_only(),
                None => false,
            }
        })
        .collect()
}

/// Name a top-level declaration sorts under: its own name, or the name of the
/// type an extension extends.
pub fn sort_name(graph: &ModuleGraph, decl: DeclId) -> &str {
    let d = graph.decl(decl);
    if d.kind == DeclKind::Extension {
        if let Some(base) = graph.extended_nominal(decl) {
            return &graph.decl(base).name;
        }
    }
    &d.name
}

/// Total order over top-level declarations.
///
/// Ascending by sort name; a value declaration precedes extensions of the same
/// name; extensions tie-break on member count, then protocol count, then the
/// first differing protocol name.
pub fn compare_top_level(graph: &ModuleGraph, lhs: DeclId, rhs: DeclId) -> Ordering {
    let by_name = sort_name(graph, lhs).cmp(sort_name(graph, rhs));
    if by_name != Ordering::Equal {
        return by_name;
    }

    let l = graph.decl(lhs);
    let r = graph.decl(rhs);
    let l_ext = l.kind == DeclKind::Extension;
    let r_ext = r.kind == DeclKind::Extension;
    if l_ext != r_ext {
        return l_ext.cmp(&r_ext);
    }
    if !l_ext {
        return Ordering::Equal;
    }

    l.members
        .len()
        .cmp(&r.members.len())
        .then_with(|| l.protocols.len().cmp(&r.protocols.len()))
        .then_with(|| {
            l.protocols
                .iter()
                .zip(&r.protocols)
                .map(|(a, b)| graph.decl(*a).name.cmp(&graph.decl(*b).name))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
}

/// Sorts `decls` in emission order and rejects two value declarations sharing a name.
pub fn sort_top_level(graph: &ModuleGraph, decls: &mut [DeclId]) -> EmitResult<()> {
    decls.sort_by(|lhs, rhs| compare_top_level(graph, *lhs, *rhs));

    for pair in decls.windows(2) {
        let (a, b) = (graph.decl(pair[0]), graph.decl(pair[1]));
        if a.kind != DeclKind::Extension && b.kind != DeclKind::Extension && a.name == b.name {
            return Err(EmitError::DuplicateTopLevelName {
                name: a.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::EmitOptions;
    use crate::printer::SyntaxPrinter;
    use hdr_types::{AccessLevel, ForeignClassKind, ForeignOrigin, ModuleKind};

    fn public_class(graph: &mut ModuleGraph, module: ModuleId, name: &str) -> DeclId {
        let id = graph.add_top_level(DeclKind::Class, name, module);
        let decl = graph.decl_mut(id);
        decl.access = AccessLevel::Public;
        decl.attrs.objc = true;
        id
    }

    fn extension(graph: &mut ModuleGraph, module: ModuleId, base: DeclId, members: usize) -> DeclId {
        let ext = graph.add_top_level(DeclKind::Extension, "", module);
        graph.decl_mut(ext).extended = Some(base);
        graph.decl_mut(ext).access = AccessLevel::Public;
        for index in 0..members {
            graph.add_member(ext, DeclKind::Function, format!("m{}", index));
        }
        ext
    }

    fn names(graph: &ModuleGraph, decls: &[DeclId]) -> Vec<String> {
        decls.iter().map(|d| sort_name(graph, *d).to_string()).collect()
    }

    #[test]
    fn sorts_by_name_regardless_of_input_order() {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        let mut decls = vec![
            public_class(&mut graph, zoo, "Cherry"),
            public_class(&mut graph, zoo, "Apple"),
            public_class(&mut graph, zoo, "Banana"),
        ];

        sort_top_level(&graph, &mut decls).unwrap();
        assert_eq!(names(&graph, &decls), vec!["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn value_declaration_precedes_its_extensions() {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        let cage = public_class(&mut graph, zoo, "Cage");
        let big = extension(&mut graph, zoo, cage, 3);
        let small = extension(&mut graph, zoo, cage, 1);
        let mut decls = vec![big, small, cage];

        sort_top_level(&graph, &mut decls).unwrap();
        assert_eq!(decls, vec![cage, small, big]);
    }

    #[test]
    fn extensions_tie_break_on_protocols() {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        let cage = public_class(&mut graph, zoo, "Cage");
        let locking = graph.add_top_level(DeclKind::Protocol, "Locking", zoo);
        let cleaning = graph.add_top_level(DeclKind::Protocol, "Cleaning", zoo);
        let locked = extension(&mut graph, zoo, cage, 1);
        graph.decl_mut(locked).protocols = vec![locking];
        let cleaned = extension(&mut graph, zoo, cage, 1);
        graph.decl_mut(cleaned).protocols = vec![cleaning];
        let both = extension(&mut graph, zoo, cage, 1);
        graph.decl_mut(both).protocols = vec![cleaning, locking];
        let plain = extension(&mut graph, zoo, cage, 1);

        let mut decls = vec![both, locked, plain, cleaned];
        sort_top_level(&graph, &mut decls).unwrap();
        assert_eq!(decls, vec![plain, cleaned, locked, both]);
    }

    #[test]
    fn duplicate_value_names_are_fatal() {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        let first = public_class(&mut graph, zoo, "Cage");
        let other = graph.add_top_level(DeclKind::Enum, "Cage", zoo);
        let mut decls = vec![first, other];

        assert_eq!(
            sort_top_level(&graph, &mut decls),
            Err(EmitError::DuplicateTopLevelName {
                name: "Cage".to_string()
            })
        );
    }

    #[test]
    fn objc_keeps_only_extensions_of_printable_native_classes() {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        let kit = graph.add_module("Kit", ModuleKind::Foreign);
        let cage = public_class(&mut graph, zoo, "Cage");
        let hidden = graph.add_top_level(DeclKind::Class, "Hidden", zoo);
        let color = public_class(&mut graph, kit, "Color");
        graph.decl_mut(color).foreign = Some(ForeignOrigin {
            owning_module: Some(kit),
            class_kind: ForeignClassKind::CfType,
        });
        let point = graph.add_top_level(DeclKind::Struct, "Point", zoo);
        graph.decl_mut(point).access = AccessLevel::Public;

        let kept = extension(&mut graph, zoo, cage, 1);
        extension(&mut graph, zoo, hidden, 1);
        extension(&mut graph, zoo, color, 1);
        let on_struct = extension(&mut graph, zoo, point, 1);

        let options = EmitOptions::objc(AccessLevel::Public);
        let printer = SyntaxPrinter::new(&graph, zoo, options);
        let objc = collect_top_level(&graph, zoo, &printer, &options.dialect);
        assert_eq!(objc, vec![cage, kept]);

        let options = EmitOptions::cxx(false);
        let printer = SyntaxPrinter::new(&graph, zoo, options);
        let cxx = collect_top_level(&graph, zoo, &printer, &options.dialect);
        assert!(cxx.contains(&on_struct));
        assert!(cxx.contains(&point));
    }
}
