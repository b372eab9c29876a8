//! Ordered pipeline stages
//!
//! Every stage runs over the whole in-flight collection before the next
//! stage starts. Order matters: overrides patch props the earlier stages
//! created, reordering runs after overrides so patched props sort by their
//! final state, and asset funcs serialize the fully final tree.

use crate::overrides::OverrideSet;
use crate::InFlightSpec;
use asset_spec_generator_common::{
    bfs_prop_tree_mut, ExistingSpec, PackageSpec, PropKind, PropSpec, Result, SchemaFamily,
    WidgetKind,
};
use asset_spec_generator_generator::{
    generate_action_funcs, generate_code_gen_func, generate_intrinsic_funcs,
    generate_management_funcs, AssetFuncGenerator,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Run the full stage sequence over the in-flight collection.
///
/// The structural precondition is checked first: a variant without a
/// domain object root is an upstream contract violation and aborts the
/// run immediately.
pub(crate) fn run_stages(
    mut specs: Vec<InFlightSpec>,
    overrides: &OverrideSet,
    existing: &HashMap<String, ExistingSpec>,
) -> Result<Vec<PackageSpec>> {
    for spec in &specs {
        spec.package.variant().check_domain_root(&spec.package.name)?;
    }

    inject_default_props(&mut specs);
    generate_default_funcs(&mut specs);
    generate_intrinsics(&mut specs);
    apply_overrides(&mut specs, overrides);
    reorder_props(&mut specs);
    generate_asset_funcs(&mut specs)?;
    reconcile_ids(&mut specs, existing);

    Ok(specs.into_iter().map(|s| s.package).collect())
}

/// Stage 1: every domain gets the hidden `extra` subtree carrying
/// platform bookkeeping, and every secrets tree gets the credential slot.
fn inject_default_props(specs: &mut [InFlightSpec]) {
    for spec in specs {
        let variant = spec.package.variant_mut();

        let domain_path = variant.domain.metadata.prop_path.clone();
        let mut extra = PropSpec::new_object("extra", &domain_path);
        extra.data.hidden = true;
        let extra_path = extra.metadata.prop_path.clone();
        if let PropKind::Object { entries } = &mut extra.kind {
            let mut resource_type =
                PropSpec::new_scalar("ResourceType", PropKind::String, &extra_path);
            resource_type.data.hidden = true;
            entries.push(resource_type);

            let mut usage_map = PropSpec::new_scalar("PropUsageMap", PropKind::Json, &extra_path);
            usage_map.data.hidden = true;
            entries.push(usage_map);
        }
        if let PropKind::Object { entries } = &mut variant.domain.kind {
            entries.push(extra);
        }

        let secrets_path = variant.secrets.metadata.prop_path.clone();
        let mut credential = PropSpec::new_scalar("Credential", PropKind::String, &secrets_path);
        credential.data.widget_kind = Some(WidgetKind::Secret);
        if let PropKind::Object { entries } = &mut variant.secrets.kind {
            entries.push(credential);
        }
    }
}

/// Stage 2: CRUD actions gated by the vendor handler declaration, the
/// code-generation func, and the management pair.
fn generate_default_funcs(specs: &mut [InFlightSpec]) {
    for spec in specs {
        let name = spec.package.name.clone();
        let domain = &spec.package.variant().domain;

        let mut funcs = generate_action_funcs(&name, domain, &spec.handlers);
        funcs.push(generate_code_gen_func(&name, domain));
        funcs.extend(generate_management_funcs(&name));

        spec.package.funcs.extend(funcs);
    }
}

/// Stage 3: shared intrinsics, once per package.
fn generate_intrinsics(specs: &mut [InFlightSpec]) {
    for spec in specs {
        spec.package.funcs.extend(generate_intrinsic_funcs());
    }
}

/// Stage 4: vendor-specific prop patches.
fn apply_overrides(specs: &mut [InFlightSpec], overrides: &OverrideSet) {
    for spec in specs {
        overrides.apply(&mut spec.package);
    }
}

/// Stage 5: within every object node, required props sort first and
/// hidden props last; ties keep source order.
fn reorder_props(specs: &mut [InFlightSpec]) {
    for spec in specs {
        let variant = spec.package.variant_mut();
        for tree in [&mut variant.domain, &mut variant.resource_value] {
            bfs_prop_tree_mut(tree, |prop| {
                if let PropKind::Object { entries } = &mut prop.kind {
                    entries.sort_by_key(|e| {
                        if e.data.hidden {
                            2u8
                        } else if e.metadata.required {
                            0
                        } else {
                            1
                        }
                    });
                }
            });
        }
    }
}

/// Stage 6: asset-definition source, emitted for the resource-type family
/// only; discovery schemas are consumed without a front-end asset form.
fn generate_asset_funcs(specs: &mut [InFlightSpec]) -> Result<()> {
    let generator = AssetFuncGenerator::new()?;
    for spec in specs {
        if spec.package.family != SchemaFamily::ResourceType {
            continue;
        }
        let func = generator.generate(&spec.package.name, spec.package.variant())?;
        spec.package.funcs.push(func);
    }
    Ok(())
}

/// Stage 7: reuse the previously published schema id where one exists,
/// keyed by schema name. The single point where cross-run state enters.
fn reconcile_ids(specs: &mut [InFlightSpec], existing: &HashMap<String, ExistingSpec>) {
    for spec in specs.iter_mut() {
        if let Some(prior) = existing.get(&spec.package.name) {
            debug!(schema = %spec.package.name, id = %prior.id, "reusing published id");
            spec.package.schema_unique_id = prior.id.clone();
        }
    }
    info!(specs = specs.len(), reused = specs
        .iter()
        .filter(|s| existing.contains_key(&s.package.name))
        .count(), "identifier reconciliation complete");
}
