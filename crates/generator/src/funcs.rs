//! Default function synthesis
//!
//! Every variant receives a fixed default set of behaviors: CRUD actions
//! gated by the vendor's handler declaration, one code-generation func, and
//! the management pair (discover, import). Intrinsics are shared across
//! variants and generated once per package.

use asset_spec_generator_common::{
    ActionKind, FuncArgumentKind, FuncArgumentSpec, FuncKind, FuncSpec, ManagementKind, PropSpec,
};

/// Generate the action funcs a resource supports.
///
/// `handlers` carries the vendor-declared operation names; an empty list
/// means no declaration was made and defaults to the full CRUD set.
pub fn generate_action_funcs(
    schema_name: &str,
    domain: &PropSpec,
    handlers: &[String],
) -> Vec<FuncSpec> {
    let slug = func_slug(schema_name);
    let all = [
        (ActionKind::Create, "create"),
        (ActionKind::Refresh, "read"),
        (ActionKind::Update, "update"),
        (ActionKind::Delete, "delete"),
    ];

    all.iter()
        .filter(|(_, handler_name)| handlers.is_empty() || has_handler(handlers, handler_name))
        .map(|(action, _)| {
            let name = format!("{}{:?}", slug, action);
            FuncSpec::new(
                &name,
                &format!("{:?} {}", action, schema_name),
                FuncKind::Action { action: *action },
                action.handler(),
            )
            .with_argument(domain_argument(domain))
        })
        .collect()
}

/// The code-generation func serializing the domain into the vendor payload.
pub fn generate_code_gen_func(schema_name: &str, domain: &PropSpec) -> FuncSpec {
    let name = format!("{}CodeGen", func_slug(schema_name));
    FuncSpec::new(
        &name,
        &format!("Code Generation for {}", schema_name),
        FuncKind::CodeGeneration,
        "generateCode",
    )
    .with_argument(domain_argument(domain))
}

/// The management pair: discover existing resources, import one by id.
pub fn generate_management_funcs(schema_name: &str) -> Vec<FuncSpec> {
    let slug = func_slug(schema_name);
    [ManagementKind::Discover, ManagementKind::Import]
        .iter()
        .map(|management| {
            FuncSpec::new(
                &format!("{}{:?}", slug, management),
                &format!("{:?} {}", management, schema_name),
                FuncKind::Management {
                    management: *management,
                },
                management.handler(),
            )
        })
        .collect()
}

/// Package-level intrinsics shared by every variant.
pub fn generate_intrinsic_funcs() -> Vec<FuncSpec> {
    vec![
        FuncSpec::new("identity", "Identity", FuncKind::Intrinsic, "identity"),
        FuncSpec::new("unset", "Unset", FuncKind::Intrinsic, "unset"),
    ]
}

fn domain_argument(domain: &PropSpec) -> FuncArgumentSpec {
    FuncArgumentSpec {
        name: "domain".to_string(),
        kind: FuncArgumentKind::Object,
        prop_unique_id: Some(domain.unique_id.clone()),
    }
}

fn has_handler(handlers: &[String], name: &str) -> bool {
    handlers.iter().any(|h| {
        let h = h.as_str();
        h == name
            || (name == "create" && h == "insert")
            || (name == "read" && h == "get")
            || (name == "update" && h == "patch")
    })
}

/// `Vendor::Storage::Bucket` -> `vendorStorageBucket`.
fn func_slug(schema_name: &str) -> String {
    let mut slug = String::with_capacity(schema_name.len());
    let mut upper_next = false;
    for c in schema_name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next && !slug.is_empty() {
                slug.extend(c.to_uppercase());
            } else {
                slug.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if let Some(first) = slug.get(0..1) {
        let lowered = first.to_lowercase();
        slug.replace_range(0..1, &lowered);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_spec_generator_common::PropSpec;

    fn domain() -> PropSpec {
        PropSpec::new_object("domain", &["root".into()])
    }

    #[test]
    fn test_empty_handlers_default_to_full_crud() {
        let funcs = generate_action_funcs("Vendor::Storage::Bucket", &domain(), &[]);
        assert_eq!(funcs.len(), 4);
        assert_eq!(funcs[0].name, "vendorStorageBucketCreate");
        assert_eq!(funcs[0].handler, "resourceCreate");
    }

    #[test]
    fn test_declared_handlers_gate_actions() {
        let handlers = vec!["create".to_string(), "delete".to_string()];
        let funcs = generate_action_funcs("Vendor::Storage::Bucket", &domain(), &handlers);
        let kinds: Vec<&FuncKind> = funcs.iter().map(|f| &f.kind).collect();
        assert_eq!(
            kinds,
            [
                &FuncKind::Action {
                    action: ActionKind::Create
                },
                &FuncKind::Action {
                    action: ActionKind::Delete
                }
            ]
        );
    }

    #[test]
    fn test_discovery_method_names_map_to_actions() {
        let handlers = vec!["insert".to_string(), "get".to_string(), "patch".to_string()];
        let funcs = generate_action_funcs("Storage::Buckets", &domain(), &handlers);
        assert_eq!(funcs.len(), 3);
        assert_eq!(funcs[1].handler, "resourceRefresh");
        assert_eq!(funcs[2].handler, "resourceUpdate");
    }

    #[test]
    fn test_action_funcs_wire_domain_argument() {
        let root = domain();
        let funcs = generate_action_funcs("Vendor::Storage::Bucket", &root, &[]);
        for func in &funcs {
            assert_eq!(func.arguments.len(), 1);
            assert_eq!(
                func.arguments[0].prop_unique_id.as_deref(),
                Some(root.unique_id.as_str())
            );
        }
    }

    #[test]
    fn test_management_pair() {
        let funcs = generate_management_funcs("Vendor::Storage::Bucket");
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].handler, "resourceDiscover");
        assert_eq!(funcs[1].handler, "resourceImport");
    }

    #[test]
    fn test_intrinsics_are_fixed() {
        let names: Vec<String> = generate_intrinsic_funcs()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["identity", "unset"]);
    }
}
