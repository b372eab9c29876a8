//! Round-trip test for asset func emission
//!
//! Re-interprets the emitted builder-pattern source and checks the
//! reconstructed tree matches the one that produced it: same kinds, same
//! names, same nesting.

use asset_spec_generator_common::{
    new_unique_id, PropKind, PropSpec, SchemaVariantSpec, SocketKind, SocketSpec,
};
use asset_spec_generator_generator::AssetFuncGenerator;

/// Structural shape reconstructed from emitted source. Array and map nodes
/// carry their entry type as the single child.
#[derive(Debug, PartialEq, Eq)]
struct Shape {
    name: String,
    kind: String,
    children: Vec<Shape>,
}

fn shape_of(prop: &PropSpec) -> Shape {
    let children = match &prop.kind {
        PropKind::Array { type_prop } | PropKind::Map { type_prop } => {
            vec![shape_of(type_prop)]
        }
        PropKind::Object { entries } => entries.iter().map(shape_of).collect(),
        _ => Vec::new(),
    };
    Shape {
        name: prop.name.clone(),
        kind: prop.kind.tag().to_string(),
        children,
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    fn skip_ws(&mut self) {
        while self.text[self.pos..].starts_with(|c: char| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) {
        assert!(
            self.eat(token),
            "expected {:?} at ...{:?}",
            token,
            &self.text[self.pos..(self.pos + 60).min(self.text.len())]
        );
    }

    fn string(&mut self) -> String {
        self.expect("\"");
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let (_, escaped) = chars.next().expect("dangling escape");
                    out.push(match escaped {
                        'n' => '\n',
                        other => other,
                    });
                }
                '"' => {
                    self.pos += i + 1;
                    return out;
                }
                other => out.push(other),
            }
        }
        panic!("unterminated string literal");
    }
}

/// Interpret one `new PropBuilder()...build()` expression.
fn interpret_prop(cur: &mut Cursor) -> Shape {
    cur.expect("new PropBuilder()");
    let mut name = String::new();
    let mut kind = String::new();
    let mut children = Vec::new();

    loop {
        if cur.eat(".setName(") {
            name = cur.string();
            cur.expect(")");
        } else if cur.eat(".setKind(") {
            kind = cur.string();
            cur.expect(")");
        } else if cur.eat(".setDocumentation(") {
            cur.string();
            cur.expect(")");
        } else if cur.eat(".addChild(") || cur.eat(".setEntry(") {
            children.push(interpret_prop(cur));
            cur.expect(")");
        } else if cur.eat(".build()") {
            break;
        } else {
            panic!(
                "unrecognized builder call at ...{:?}",
                &cur.text[cur.pos..(cur.pos + 60).min(cur.text.len())]
            );
        }
    }

    Shape {
        name,
        kind,
        children,
    }
}

/// Interpret every `asset.addProp(...)` in emitted source.
fn interpret_props(code: &str) -> Vec<Shape> {
    let mut shapes = Vec::new();
    let mut search = 0;
    while let Some(found) = code[search..].find("asset.addProp(") {
        let mut cur = Cursor::new(code, search + found + "asset.addProp(".len());
        shapes.push(interpret_prop(&mut cur));
        search = cur.pos;
    }
    shapes
}

fn scalar(name: &str, kind: PropKind, parent: &[String]) -> PropSpec {
    PropSpec::new_scalar(name, kind, parent)
}

fn representative_variant() -> SchemaVariantSpec {
    let mut domain = PropSpec::new_object("domain", &["root".to_string()]);
    let domain_path = domain.metadata.prop_path.clone();

    let name = scalar("Name", PropKind::String, &domain_path);

    let mut config = PropSpec::new_object("Config", &domain_path);
    let config_path = config.metadata.prop_path.clone();
    if let PropKind::Object { entries } = &mut config.kind {
        entries.push(scalar("Enabled", PropKind::Boolean, &config_path));
        entries.push(scalar("Level", PropKind::Number, &config_path));
    }

    let mut tag = PropSpec::new_object("TagsItem", &domain_path);
    let tag_path = tag.metadata.prop_path.clone();
    if let PropKind::Object { entries } = &mut tag.kind {
        entries.push(scalar("Key", PropKind::String, &tag_path));
        entries.push(scalar("Value", PropKind::String, &tag_path));
    }
    let tags = PropSpec {
        kind: PropKind::Array {
            type_prop: Box::new(tag),
        },
        ..scalar("Tags", PropKind::String, &domain_path)
    };

    if let PropKind::Object { entries } = &mut domain.kind {
        entries.push(name);
        entries.push(config);
        entries.push(tags);
    }

    SchemaVariantSpec {
        unique_id: new_unique_id(),
        domain,
        resource_value: PropSpec::new_object("resource_value", &["root".to_string()]),
        secrets: PropSpec::new_object("secrets", &["root".to_string()]),
        sockets: vec![SocketSpec::new(
            "token",
            SocketKind::Input,
            "/domain/token".to_string(),
        )],
    }
}

#[test]
fn test_emitted_source_round_trips() {
    let variant = representative_variant();
    let generator = AssetFuncGenerator::new().unwrap();
    let func = generator
        .generate("Vendor::Storage::Bucket", &variant)
        .unwrap();
    let code = func.code.as_deref().expect("asset funcs carry source");

    let expected: Vec<Shape> = variant.domain.entries().iter().map(shape_of).collect();
    let reconstructed = interpret_props(code);

    assert_eq!(reconstructed, expected);
}

#[test]
fn test_emitted_source_declares_sockets() {
    let variant = representative_variant();
    let generator = AssetFuncGenerator::new().unwrap();
    let func = generator
        .generate("Vendor::Storage::Bucket", &variant)
        .unwrap();
    let code = func.code.as_deref().unwrap();

    assert!(code.contains("asset.addInputSocket("));
    assert!(code.contains(".setName(\"token\")"));
    assert!(code.contains(".setArity(\"one\")"));
}

#[test]
fn test_asset_func_metadata() {
    let variant = representative_variant();
    let generator = AssetFuncGenerator::new().unwrap();
    let func = generator
        .generate("Vendor::Storage::Bucket", &variant)
        .unwrap();

    assert_eq!(func.name, "VendorStorageBucketAsset");
    assert_eq!(func.handler, "main");
}
