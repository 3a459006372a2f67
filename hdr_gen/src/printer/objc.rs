use super::{EmitStreams, PrintContext, SyntaxPrinter};
use crate::dialect::Language;
use hdr_types::{DeclId, DeclKind, TypeExpr};

fn nullability(nullable: bool) -> &'static str {
    if nullable { "_Nullable" } else { "_Nonnull" }
}

/* Format a type in Objective-C syntax */
pub fn print_type(printer: &SyntaxPrinter<'_>, ty: &TypeExpr) -> String {
    format_type(printer, ty, false)
}

fn format_type(printer: &SyntaxPrinter<'_>, ty: &TypeExpr, nullable: bool) -> String {
    let graph = printer.graph;
    match ty {
        TypeExpr::Builtin(name) => printer
            .type_mapping
            .spelling(name, Language::ObjC)
            .to_string(),
        TypeExpr::Nominal(id) => {
            let decl = graph.decl(*id);
            match decl.kind {
                DeclKind::Class => format!("{} * {}", decl.name_for_objc(), nullability(nullable)),
                DeclKind::Protocol => {
                    format!("id <{}> {}", decl.name_for_objc(), nullability(nullable))
                }
                _ => decl.name_for_objc().to_string(),
            }
        }
        TypeExpr::Alias(id) => graph.decl(*id).name_for_objc().to_string(),
        TypeExpr::BoundGeneric { decl, args } => {
            let decl = graph.decl(*decl);
            let args = args
                .iter()
                .map(|arg| format_type(printer, arg, false))
                .collect::<Vec<_>>()
                .join(", ");
            if decl.kind == DeclKind::Class {
                format!("{}<{}> * {}", decl.name_for_objc(), args, nullability(nullable))
            } else {
                format!("{}<{}>", decl.name_for_objc(), args)
            }
        }
        TypeExpr::Optional(inner) => format_type(printer, inner, true),
        TypeExpr::Tuple(elems) if elems.is_empty() => "void".to_string(),
        TypeExpr::Tuple(_) => format!("NSArray * {}", nullability(nullable)),
        TypeExpr::Function { params, result } => format!(
            "{} (^ {})({})",
            format_type(printer, result, false),
            nullability(nullable),
            format_block_params(printer, params)
        ),
        TypeExpr::GenericParam(_) => format!("id {}", nullability(nullable)),
    }
}

fn format_block_params(printer: &SyntaxPrinter<'_>, params: &[TypeExpr]) -> String {
    if params.is_empty() {
        return "void".to_string();
    }
    params
        .iter()
        .map(|param| format_type(printer, param, false))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_object_type(printer: &SyntaxPrinter<'_>, ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Nominal(id) | TypeExpr::BoundGeneric { decl: id, .. } => matches!(
            printer.graph.decl(*id).kind,
            DeclKind::Class | DeclKind::Protocol
        ),
        TypeExpr::Optional(inner) => is_object_type(printer, inner),
        TypeExpr::GenericParam(_) | TypeExpr::Function { .. } => true,
        _ => false,
    }
}

/* Format one property or method line */
fn format_member(printer: &SyntaxPrinter<'_>, member: DeclId) -> Option<String> {
    let decl = printer.graph.decl(member);
    let void = TypeExpr::void();
    let ty = decl.interface_type.as_ref().unwrap_or(&void);
    match decl.kind {
        DeclKind::Var => {
            let attributes = if matches!(ty, TypeExpr::Function { .. }) {
                "nonatomic, copy"
            } else if is_object_type(printer, ty) {
                "nonatomic, strong"
            } else {
                "nonatomic"
            };
            Some(format!(
                "@property ({}) {} {};",
                attributes,
                print_type(printer, ty),
                decl.name_for_objc()
            ))
        }
        DeclKind::Function => {
            let (params, result) = match ty {
                TypeExpr::Function { params, result } => (params.as_slice(), result.as_ref()),
                other => (&[][..], other),
            };
            let mut line = format!("- ({}){}", print_type(printer, result), decl.name_for_objc());
            for (index, param) in params.iter().enumerate() {
                if index > 0 {
                    line.push(' ');
                }
                line.push_str(&format!(":({})arg{}", print_type(printer, param), index));
            }
            line.push(';');
            Some(line)
        }
        _ => None,
    }
}

fn format_members(printer: &SyntaxPrinter<'_>, members: &[DeclId], skip: &super::DelayedMembers) -> String {
    let mut out = String::new();
    for member in members {
        if skip.contains(member) {
            continue;
        }
        if let Some(line) = format_member(printer, *member) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn format_protocol_list(printer: &SyntaxPrinter<'_>, protocols: &[DeclId]) -> String {
    if protocols.is_empty() {
        return String::new();
    }
    let names = protocols
        .iter()
        .map(|proto| printer.graph.decl(*proto).name_for_objc())
        .collect::<Vec<_>>()
        .join(", ");
    format!(" <{}>", names)
}

pub fn print_decl(
    printer: &SyntaxPrinter<'_>,
    decl: DeclId,
    ctx: &PrintContext<'_>,
    streams: &mut EmitStreams,
) {
    let text = match printer.graph.decl(decl).kind {
        DeclKind::Class => format_class(printer, decl, ctx),
        DeclKind::Protocol => format_protocol(printer, decl, ctx),
        DeclKind::Extension => format_extension(printer, decl, ctx),
        DeclKind::Enum => format_enum(printer, decl),
        DeclKind::Function => format_function(printer, decl),
        _ => return,
    };
    streams.main.push_str(&text);
}

fn format_class(printer: &SyntaxPrinter<'_>, class: DeclId, ctx: &PrintContext<'_>) -> String {
    let graph = printer.graph;
    let decl = graph.decl(class);
    let mut out = format!(
        "HDR_CLASS(\"{}.{}\")\n@interface {}",
        printer.module_name(),
        decl.name,
        decl.name_for_objc()
    );
    if let Some(superclass) = decl.superclass {
        out.push_str(&format!(" : {}", graph.decl(superclass).name_for_objc()));
    }
    out.push_str(&format_protocol_list(printer, &printer.included_protocols(class)));
    out.push('\n');
    out.push_str(&format_members(printer, &printer.printable_members(class), ctx.delayed));
    out.push_str("@end\n");
    out
}

fn format_protocol(printer: &SyntaxPrinter<'_>, proto: DeclId, ctx: &PrintContext<'_>) -> String {
    let decl = printer.graph.decl(proto);
    let mut out = format!(
        "HDR_PROTOCOL(\"{}.{}\")\n@protocol {}",
        printer.module_name(),
        decl.name,
        decl.name_for_objc()
    );
    out.push_str(&format_protocol_list(printer, &printer.included_protocols(proto)));
    out.push('\n');
    out.push_str(&format_members(printer, &printer.printable_members(proto), ctx.delayed));
    out.push_str("@end\n");
    out
}

fn format_extension(printer: &SyntaxPrinter<'_>, ext: DeclId, ctx: &PrintContext<'_>) -> String {
    let graph = printer.graph;
    let base = graph
        .extended_nominal(ext)
        .map(|base| graph.decl(base).name_for_objc().to_string())
        .unwrap_or_default();
    let mut out = format!("@interface {} (HDR_EXTENSION({}))", base, printer.module_name());
    out.push_str(&format_protocol_list(printer, &printer.included_protocols(ext)));
    out.push('\n');
    out.push_str(&format_members(printer, &printer.printable_members(ext), ctx.delayed));
    out.push_str("@end\n");
    out
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_enum(printer: &SyntaxPrinter<'_>, enum_decl: DeclId) -> String {
    let decl = printer.graph.decl(enum_decl);
    let raw = decl
        .raw_type
        .as_ref()
        .map(|raw| print_type(printer, raw))
        .unwrap_or_else(|| "NSInteger".to_string());
    let mut out = format!(
        "typedef HDR_ENUM({}, {}, closed) {{\n",
        raw,
        decl.name_for_objc()
    );
    let cases = decl
        .members
        .iter()
        .map(|member| printer.graph.decl(*member))
        .filter(|member| member.kind == DeclKind::EnumCase);
    for (index, case) in cases.enumerate() {
        out.push_str(&format!(
            "  {}{} = {},\n",
            decl.name_for_objc(),
            capitalize(&case.name),
            index
        ));
    }
    out.push_str("};\n");
    out
}

fn format_function(printer: &SyntaxPrinter<'_>, func: DeclId) -> String {
    let decl = printer.graph.decl(func);
    let void = TypeExpr::void();
    let (params, result) = match decl.interface_type.as_ref() {
        Some(TypeExpr::Function { params, result }) => (params.as_slice(), result.as_ref()),
        Some(other) => (&[][..], other),
        None => (&[][..], &void),
    };
    let params = if params.is_empty() {
        "void".to_string()
    } else {
        params
            .iter()
            .enumerate()
            .map(|(index, param)| format!("{} arg{}", print_type(printer, param), index))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "HDR_EXTERN {} {}({}) HDR_WARN_UNUSED_RESULT;\n",
        print_type(printer, result),
        decl.name_for_objc(),
        params
    )
}

/* Reopen the container in a category holding only the delayed members */
pub fn print_ad_hoc_category(printer: &SyntaxPrinter<'_>, members: &[DeclId], streams: &mut EmitStreams) {
    let Some(container) = members
        .first()
        .and_then(|member| printer.graph.decl(*member).parent)
    else {
        return;
    };
    let name = printer.graph.decl(container).name_for_objc();
    let mut out = format!("\n@interface {} (HDR_EXTENSION({}))\n", name, printer.module_name());
    out.push_str(&format_members(printer, members, &Default::default()));
    out.push_str("@end\n");
    streams.main.push_str(&out);
}
