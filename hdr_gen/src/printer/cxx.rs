use super::{EmitStreams, PrintContext, SyntaxPrinter};
use crate::dialect::Language;
use hdr_types::{DeclId, DeclKind, ModuleKind, TypeExpr};

/* Format a type in C++ syntax, qualifying names from other modules */
pub fn print_type(printer: &SyntaxPrinter<'_>, ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Builtin(name) => printer
            .type_mapping
            .spelling(name, Language::Cxx)
            .to_string(),
        TypeExpr::Nominal(id) | TypeExpr::Alias(id) => qualified_name(printer, *id),
        TypeExpr::BoundGeneric { decl, args } => format!(
            "{}<{}>",
            qualified_name(printer, *decl),
            join_types(printer, args)
        ),
        TypeExpr::Optional(inner) => format!("hdr::Optional<{}>", print_type(printer, inner)),
        TypeExpr::Tuple(elems) if elems.is_empty() => "void".to_string(),
        TypeExpr::Tuple(elems) => format!("hdr::Tuple<{}>", join_types(printer, elems)),
        TypeExpr::Function { params, result } => format!(
            "hdr::Function<{}({})>",
            print_type(printer, result),
            join_types(printer, params)
        ),
        TypeExpr::GenericParam(id) => printer.graph.decl(*id).name.clone(),
    }
}

fn join_types(printer: &SyntaxPrinter<'_>, types: &[TypeExpr]) -> String {
    types
        .iter()
        .map(|ty| print_type(printer, ty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn qualified_name(printer: &SyntaxPrinter<'_>, id: DeclId) -> String {
    let graph = printer.graph;
    let decl = graph.decl(id);
    if decl.module == printer.module {
        return decl.name.clone();
    }
    let module = graph.module(decl.module);
    match module.kind {
        ModuleKind::Stdlib => format!("hdr::{}", decl.name),
        _ => format!("{}::{}", module.name, decl.name),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/* Name of the C entry point backing a declaration */
fn thunk_name(printer: &SyntaxPrinter<'_>, decl: DeclId) -> String {
    let graph = printer.graph;
    let d = graph.decl(decl);
    match d.parent {
        Some(parent) => format!("{}_{}_{}", printer.module_name(), graph.decl(parent).name, d.name),
        None => format!("{}_{}", printer.module_name(), d.name),
    }
}

/* Parameter and result types of a callable or stored member */
fn signature(decl: &hdr_types::Declaration) -> (Vec<TypeExpr>, TypeExpr) {
    match &decl.interface_type {
        Some(TypeExpr::Function { params, result }) => (params.clone(), result.as_ref().clone()),
        Some(other) => (Vec::new(), other.clone()),
        None => (Vec::new(), TypeExpr::void()),
    }
}

fn member_name(decl: &hdr_types::Declaration) -> String {
    match decl.kind {
        DeclKind::Var => format!("get{}", capitalize(&decl.name)),
        _ => decl.name.clone(),
    }
}

fn format_params(printer: &SyntaxPrinter<'_>, params: &[TypeExpr]) -> String {
    params
        .iter()
        .enumerate()
        .map(|(index, param)| format!("{} arg{}", print_type(printer, param), index))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_args(params: &[TypeExpr]) -> Vec<String> {
    (0..params.len()).map(|index| format!("arg{}", index)).collect()
}

fn thunk_declaration(printer: &SyntaxPrinter<'_>, decl: DeclId, has_self: bool) -> String {
    let d = printer.graph.decl(decl);
    let (params, result) = signature(d);
    let mut list = Vec::new();
    if has_self {
        list.push("void * _Nonnull self".to_string());
    }
    if !params.is_empty() {
        list.push(format_params(printer, &params));
    }
    let list = if list.is_empty() { "void".to_string() } else { list.join(", ") };
    format!(
        "HDR_EXTERN {} {}({}) HDR_NOEXCEPT HDR_CALL;\n",
        print_type(printer, &result),
        thunk_name(printer, decl),
        list
    )
}

fn member_declaration(printer: &SyntaxPrinter<'_>, member: DeclId) -> String {
    let d = printer.graph.decl(member);
    let (params, result) = signature(d);
    format!(
        "  {} {}({}) const;\n",
        print_type(printer, &result),
        member_name(d),
        format_params(printer, &params)
    )
}

fn member_definition(printer: &SyntaxPrinter<'_>, member: DeclId) -> String {
    let graph = printer.graph;
    let d = graph.decl(member);
    let Some(container) = d.parent else {
        return String::new();
    };
    let (params, result) = signature(d);
    let mut args = vec!["_getOpaquePointer()".to_string()];
    args.extend(format_args(&params));
    let call = format!("_impl::{}({})", thunk_name(printer, member), args.join(", "));
    let body = if result.is_void() {
        format!("  {};\n", call)
    } else {
        format!("  return {};\n", call)
    };
    format!(
        "inline {} {}::{}({}) const {{\n{}}}\n",
        print_type(printer, &result),
        graph.decl(container).name,
        member_name(d),
        format_params(printer, &params),
        body
    )
}

/* Callable members of a type plus the members its recorded extensions add */
fn body_members(printer: &SyntaxPrinter<'_>, decl: DeclId, ctx: &PrintContext<'_>) -> Vec<DeclId> {
    let mut members: Vec<DeclId> = printer
        .printable_members(decl)
        .into_iter()
        .filter(|member| printer.graph.decl(*member).kind != DeclKind::EnumCase)
        .collect();
    for ext in ctx.extensions {
        members.extend(printer.printable_members(*ext));
    }
    members
}

pub fn print_decl(
    printer: &SyntaxPrinter<'_>,
    decl: DeclId,
    ctx: &PrintContext<'_>,
    streams: &mut EmitStreams,
) {
    match printer.graph.decl(decl).kind {
        DeclKind::Class | DeclKind::Struct => print_record(printer, decl, ctx, streams),
        DeclKind::Enum => streams.main.push_str(&format_enum(printer, decl)),
        DeclKind::Function => print_function(printer, decl, streams),
        _ => {}
    }
}

fn print_record(
    printer: &SyntaxPrinter<'_>,
    decl: DeclId,
    ctx: &PrintContext<'_>,
    streams: &mut EmitStreams,
) {
    let graph = printer.graph;
    let d = graph.decl(decl);
    let members = body_members(printer, decl, ctx);

    let mut out = format!(
        "class HDR_SYMBOL(\"{}.{}\") {}",
        printer.module_name(),
        d.name,
        d.name
    );
    if d.kind == DeclKind::Struct {
        out.push_str(" final");
    }
    match d.superclass {
        Some(superclass) => out.push_str(&format!(" : public {}", qualified_name(printer, superclass))),
        None if d.kind == DeclKind::Class => out.push_str(" : public hdr::RefCountedClass"),
        None => {}
    }
    out.push_str(" {\npublic:\n");
    for member in &members {
        out.push_str(&member_declaration(printer, *member));
    }
    out.push_str("};\n");
    streams.main.push_str(&out);

    for member in &members {
        streams.prologue.push_str(&thunk_declaration(printer, *member, true));
        if !ctx.delayed.contains(member) {
            streams.out_of_line.push_str(&member_definition(printer, *member));
        }
    }
}

fn format_enum(printer: &SyntaxPrinter<'_>, decl: DeclId) -> String {
    let d = printer.graph.decl(decl);
    let mut out = format!("enum class HDR_SYMBOL(\"{}.{}\") {}", printer.module_name(), d.name, d.name);
    if let Some(raw) = &d.raw_type {
        out.push_str(&format!(" : {}", print_type(printer, raw)));
    }
    out.push_str(" {\n");
    for member in &d.members {
        let case = printer.graph.decl(*member);
        if case.kind == DeclKind::EnumCase {
            out.push_str(&format!("  {},\n", case.name));
        }
    }
    out.push_str("};\n");
    out
}

fn print_function(printer: &SyntaxPrinter<'_>, decl: DeclId, streams: &mut EmitStreams) {
    let d = printer.graph.decl(decl);
    let (params, result) = signature(d);
    streams.prologue.push_str(&thunk_declaration(printer, decl, false));

    let call = format!(
        "_impl::{}({})",
        thunk_name(printer, decl),
        format_args(&params).join(", ")
    );
    let body = if result.is_void() {
        format!("  {};\n", call)
    } else {
        format!("  return {};\n", call)
    };
    streams.main.push_str(&format!(
        "inline {} {}({}) noexcept HDR_SYMBOL(\"{}.{}\") HDR_WARN_UNUSED_RESULT {{\n{}}}\n",
        print_type(printer, &result),
        d.name,
        format_params(printer, &params),
        printer.module_name(),
        d.name,
        body
    ));
}

/* Delayed members were declared in their class body; define them once everything is visible */
pub fn print_ad_hoc_category(printer: &SyntaxPrinter<'_>, members: &[DeclId], streams: &mut EmitStreams) {
    streams.main.push('\n');
    for member in members {
        streams.main.push_str(&member_definition(printer, *member));
    }
}
