//! Vendor-specific override application
//!
//! Some vendor schemas model a property in a way the generic rules render
//! poorly, the canonical case being policy documents: structurally objects,
//! but authored as free-form JSON. Overrides patch individual props by
//! schema name and path after the tree is built.

use asset_spec_generator_common::{PackageSpec, PropKind, PropSpec, SuggestSource, WidgetKind};
use tracing::{debug, warn};

/// What an override does to its target prop.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideAction {
    /// Collapse the prop to a free-form JSON value with a code editor.
    /// Children, if any, are dropped.
    JsonEditor,
    Hide,
    DocLink(String),
    /// Annotate the prop with a cross-schema value-completion source.
    /// Appends; one prop can carry several sources.
    Suggest(SuggestSource),
}

/// One override: a schema name, a slash-separated path below the domain
/// root, and the action to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub schema: String,
    pub prop_path: String,
    pub action: OverrideAction,
}

/// The override table for a run.
#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    entries: Vec<Override>,
}

impl OverrideSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table: policy-document props that must render as JSON
    /// editors rather than deep object forms, plus cross-schema value
    /// suggestions for the identifier props users wire together most.
    pub fn builtin() -> Self {
        let json_editor = |schema: &str, path: &str| Override {
            schema: schema.to_string(),
            prop_path: path.to_string(),
            action: OverrideAction::JsonEditor,
        };
        let suggest = |schema: &str, path: &str, source_schema: &str, source_prop: &str| Override {
            schema: schema.to_string(),
            prop_path: path.to_string(),
            action: OverrideAction::Suggest(SuggestSource {
                schema: source_schema.to_string(),
                prop: source_prop.to_string(),
            }),
        };
        Self {
            entries: vec![
                json_editor("AWS::IAM::Role", "AssumeRolePolicyDocument"),
                json_editor("AWS::IAM::Policy", "PolicyDocument"),
                json_editor("AWS::IAM::ManagedPolicy", "PolicyDocument"),
                json_editor("AWS::SQS::QueuePolicy", "PolicyDocument"),
                json_editor("AWS::S3::BucketPolicy", "PolicyDocument"),
                suggest(
                    "AWS::EC2::NetworkInterface",
                    "GroupSet/GroupSetItem",
                    "AWS::EC2::SecurityGroup",
                    "GroupId",
                ),
                suggest(
                    "AWS::EC2::Route",
                    "GatewayId",
                    "AWS::EC2::InternetGateway",
                    "InternetGatewayId",
                ),
                suggest(
                    "AWS::EC2::Route",
                    "GatewayId",
                    "AWS::EC2::VPNGateway",
                    "VPNGatewayId",
                ),
                suggest(
                    "AWS::EC2::VPCCidrBlock",
                    "Ipv4IpamPoolId",
                    "AWS::EC2::IPAMPool",
                    "IpamPoolId",
                ),
                suggest(
                    "AWS::EC2::VPCCidrBlock",
                    "Ipv6IpamPoolId",
                    "AWS::EC2::IPAMPool",
                    "IpamPoolId",
                ),
            ],
        }
    }

    pub fn push(&mut self, entry: Override) {
        self.entries.push(entry);
    }

    /// Apply every matching override to one package. A target path that no
    /// longer exists is logged and skipped; overrides are advisory patches,
    /// not contracts.
    pub fn apply(&self, package: &mut PackageSpec) {
        let schema = package.name.clone();
        for entry in self.entries.iter().filter(|e| e.schema == schema) {
            let domain = &mut package.variant_mut().domain;
            let segments: Vec<&str> = entry
                .prop_path
                .split('/')
                .filter(|s| !s.is_empty())
                .collect();
            match find_mut(domain, &segments) {
                Some(prop) => {
                    apply_action(prop, &entry.action);
                    debug!(schema = %entry.schema, path = %entry.prop_path, "applied override");
                }
                None => {
                    warn!(schema = %entry.schema, path = %entry.prop_path, "override target missing")
                }
            }
        }
    }
}

fn apply_action(prop: &mut PropSpec, action: &OverrideAction) {
    match action {
        OverrideAction::JsonEditor => {
            prop.kind = PropKind::Json;
            prop.data.widget_kind = Some(WidgetKind::CodeEditor);
        }
        OverrideAction::Hide => prop.data.hidden = true,
        OverrideAction::DocLink(link) => prop.data.doc_link = Some(link.clone()),
        OverrideAction::Suggest(source) => prop.data.suggest_sources.push(source.clone()),
    }
}

fn find_mut<'a>(prop: &'a mut PropSpec, segments: &[&str]) -> Option<&'a mut PropSpec> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(prop);
    };
    match &mut prop.kind {
        PropKind::Object { entries } => entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(head))
            .and_then(|e| find_mut(e, rest)),
        PropKind::Array { type_prop } | PropKind::Map { type_prop }
            if type_prop.name.eq_ignore_ascii_case(head) =>
        {
            find_mut(type_prop, rest)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_spec_generator_common::{
        new_unique_id, SchemaFamily, SchemaVariantSpec,
    };

    fn package(name: &str, domain: PropSpec) -> PackageSpec {
        PackageSpec {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: None,
            category: None,
            family: SchemaFamily::ResourceType,
            schema_unique_id: new_unique_id(),
            schemas: vec![SchemaVariantSpec {
                unique_id: new_unique_id(),
                domain,
                resource_value: PropSpec::new_object("resource_value", &["root".into()]),
                secrets: PropSpec::new_object("secrets", &["root".into()]),
                sockets: Vec::new(),
            }],
            funcs: Vec::new(),
        }
    }

    #[test]
    fn test_json_editor_override_collapses_object() {
        let mut domain = PropSpec::new_object("domain", &["root".into()]);
        let policy = PropSpec::new_object("PolicyDocument", &domain.metadata.prop_path);
        if let PropKind::Object { entries } = &mut domain.kind {
            entries.push(policy);
        }
        let mut pkg = package("AWS::IAM::Policy", domain);

        OverrideSet::builtin().apply(&mut pkg);

        let policy = pkg.variant().domain.find_child("PolicyDocument").unwrap();
        assert_eq!(policy.kind, PropKind::Json);
        assert_eq!(policy.data.widget_kind, Some(WidgetKind::CodeEditor));
    }

    #[test]
    fn test_override_for_other_schema_does_not_apply() {
        let mut domain = PropSpec::new_object("domain", &["root".into()]);
        let policy = PropSpec::new_object("PolicyDocument", &domain.metadata.prop_path);
        if let PropKind::Object { entries } = &mut domain.kind {
            entries.push(policy);
        }
        let mut pkg = package("AWS::S3::Bucket", domain);

        OverrideSet::builtin().apply(&mut pkg);

        let policy = pkg.variant().domain.find_child("PolicyDocument").unwrap();
        assert!(matches!(policy.kind, PropKind::Object { .. }));
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let domain = PropSpec::new_object("domain", &["root".into()]);
        let mut pkg = package("AWS::IAM::Policy", domain);
        // Must not panic; the warning is the whole behavior.
        OverrideSet::builtin().apply(&mut pkg);
    }

    #[test]
    fn test_suggest_sources_accumulate_on_one_prop() {
        let mut domain = PropSpec::new_object("domain", &["root".into()]);
        if let PropKind::Object { entries } = &mut domain.kind {
            entries.push(PropSpec::new_scalar(
                "GatewayId",
                PropKind::String,
                &["root".into(), "domain".into()],
            ));
        }
        let mut pkg = package("AWS::EC2::Route", domain);

        OverrideSet::builtin().apply(&mut pkg);

        let gateway = pkg.variant().domain.find_child("GatewayId").unwrap();
        let schemas: Vec<&str> = gateway
            .data
            .suggest_sources
            .iter()
            .map(|s| s.schema.as_str())
            .collect();
        assert_eq!(
            schemas,
            ["AWS::EC2::InternetGateway", "AWS::EC2::VPNGateway"]
        );
        // The annotation never changes the prop's shape.
        assert_eq!(gateway.kind, PropKind::String);
    }

    #[test]
    fn test_hide_and_doc_link_actions() {
        let mut domain = PropSpec::new_object("domain", &["root".into()]);
        if let PropKind::Object { entries } = &mut domain.kind {
            entries.push(PropSpec::new_scalar(
                "Token",
                PropKind::String,
                &["root".into(), "domain".into()],
            ));
        }
        let mut pkg = package("Vendor::Auth::Key", domain);

        let mut set = OverrideSet::empty();
        set.push(Override {
            schema: "Vendor::Auth::Key".to_string(),
            prop_path: "Token".to_string(),
            action: OverrideAction::Hide,
        });
        set.push(Override {
            schema: "Vendor::Auth::Key".to_string(),
            prop_path: "Token".to_string(),
            action: OverrideAction::DocLink("https://example.dev/token".to_string()),
        });
        set.apply(&mut pkg);

        let token = pkg.variant().domain.find_child("Token").unwrap();
        assert!(token.data.hidden);
        assert_eq!(token.data.doc_link.as_deref(), Some("https://example.dev/token"));
    }
}
