//! Asset-definition source emission
//!
//! Serializes a domain prop tree into literal builder-pattern source text,
//! the asset func the front end executes to reconstruct the schema. This is
//! textual code generation with a fixed grammar: one call emission per node
//! kind. Correctness criterion is the round trip, re-executing the emitted
//! text must rebuild the same kinds, names, and nesting.

use crate::templates;
use asset_spec_generator_common::{
    FuncKind, FuncSpec, PropKind, PropSpec, Result, SchemaVariantSpec, SocketArity, SocketKind,
    SpecError,
};
use serde::Serialize;
use tera::Tera;
use tracing::debug;

/// Emits asset funcs from finished schema variants.
pub struct AssetFuncGenerator {
    tera: Tera,
}

#[derive(Serialize)]
struct SocketContext {
    method: &'static str,
    name: String,
    arity: &'static str,
}

impl AssetFuncGenerator {
    pub fn new() -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera })
    }

    /// Generate the asset func for one variant: every domain prop emitted
    /// as a builder expression, every socket as a socket-definition call.
    pub fn generate(&self, schema_name: &str, variant: &SchemaVariantSpec) -> Result<FuncSpec> {
        let props: Vec<String> = variant
            .domain
            .entries()
            .iter()
            .map(|prop| emit_prop(prop, 2))
            .collect();

        let sockets: Vec<SocketContext> = variant
            .sockets
            .iter()
            .map(|socket| SocketContext {
                method: match socket.kind {
                    SocketKind::Input => "addInputSocket",
                    SocketKind::Output => "addOutputSocket",
                },
                name: socket.name.clone(),
                arity: match socket.arity {
                    SocketArity::One => "one",
                    SocketArity::Many => "many",
                },
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("props", &props);
        context.insert("sockets", &sockets);

        let code = self
            .tera
            .render("asset_func", &context)
            .map_err(|e| SpecError::Generation(format!("Template error: {}", e)))?;

        debug!(
            schema = %schema_name,
            props = variant.domain.entries().len(),
            sockets = variant.sockets.len(),
            "emitted asset func"
        );

        let mut func = FuncSpec::new(
            &format!("{}Asset", asset_slug(schema_name)),
            &format!("Asset definition for {}", schema_name),
            FuncKind::Asset,
            "main",
        );
        func.code = Some(code);
        Ok(func)
    }
}

/// Emit one prop as a builder expression at the given indent depth.
///
/// Grammar, one emission per kind: scalar leaves chain on one line; an
/// object emits one `addChild` per entry; array and map emit a single
/// `setEntry` carrying the element type.
fn emit_prop(prop: &PropSpec, depth: usize) -> String {
    let pad = "    ".repeat(depth);
    let inner = "    ".repeat(depth + 1);

    match &prop.kind {
        PropKind::String | PropKind::Number | PropKind::Boolean | PropKind::Json => {
            let mut line = format!(
                "{pad}new PropBuilder().setName(\"{}\").setKind(\"{}\")",
                quote(&prop.name),
                prop.kind.tag()
            );
            if let Some(docs) = &prop.data.documentation {
                line.push_str(&format!(".setDocumentation(\"{}\")", quote(docs)));
            }
            line.push_str(".build()");
            line
        }
        PropKind::Array { type_prop } | PropKind::Map { type_prop } => {
            format!(
                "{pad}new PropBuilder()\n\
                 {inner}.setName(\"{}\")\n\
                 {inner}.setKind(\"{}\")\n\
                 {inner}.setEntry(\n{}\n{inner})\n\
                 {inner}.build()",
                quote(&prop.name),
                prop.kind.tag(),
                emit_prop(type_prop, depth + 2),
            )
        }
        PropKind::Object { entries } => {
            let mut out = format!(
                "{pad}new PropBuilder()\n\
                 {inner}.setName(\"{}\")\n\
                 {inner}.setKind(\"object\")",
                quote(&prop.name)
            );
            for entry in entries {
                out.push_str(&format!(
                    "\n{inner}.addChild(\n{}\n{inner})",
                    emit_prop(entry, depth + 2)
                ));
            }
            out.push_str(&format!("\n{inner}.build()"));
            out
        }
    }
}

fn quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn asset_slug(schema_name: &str) -> String {
    schema_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
