//! Reference dereferencing with cycle handling
//!
//! Named references are inlined recursively against the document's
//! definitions map. A per-descent-path visited set breaks cycles by
//! substituting a sentinel leaf; the set is per-path rather than global so
//! two sibling branches referencing the same definition (a diamond, not a
//! cycle) each inline fully.

use crate::schema::{AdditionalProperties, OrderedMap, Property};
use asset_spec_generator_common::{Result, SpecError};
use tracing::warn;

pub struct Dereferencer<'a> {
    definitions: &'a OrderedMap<Property>,
}

impl<'a> Dereferencer<'a> {
    pub fn new(definitions: &'a OrderedMap<Property>) -> Self {
        Self { definitions }
    }

    /// Inline every reference in one property subtree.
    ///
    /// Returns `Ok(None)` for a dangling reference: vendor documents
    /// routinely carry unused, incomplete definitions, so a bad nested
    /// pointer omits the property instead of failing the resource.
    pub fn inline_property(&self, prop: &Property) -> Result<Option<Property>> {
        let mut path = Vec::new();
        self.inline(prop, &mut path)
    }

    /// Resolve a reference at method/operation level, where an unknown name
    /// is a contract violation and fatal for the resource.
    pub fn resolve_method_ref(&self, reference: &str, location: &str) -> Result<Property> {
        let name = ref_name(reference);
        let definition =
            self.definitions
                .get(name)
                .ok_or_else(|| SpecError::UnknownReference {
                    name: name.to_string(),
                    location: location.to_string(),
                })?;
        let mut path = vec![name.to_string()];
        self.inline(definition, &mut path)?
            .ok_or_else(|| SpecError::UnknownReference {
                name: name.to_string(),
                location: location.to_string(),
            })
    }

    /// Inline every root property of a document, dropping dangling ones.
    pub fn inline_properties(
        &self,
        properties: &OrderedMap<Property>,
    ) -> Result<OrderedMap<Property>> {
        let mut inlined = OrderedMap::new();
        for (name, prop) in properties.iter() {
            match self.inline_property(prop)? {
                Some(resolved) => inlined.insert(name.clone(), resolved),
                None => warn!(property = %name, "dropping property with dangling reference"),
            }
        }
        Ok(inlined)
    }

    fn inline(&self, prop: &Property, path: &mut Vec<String>) -> Result<Option<Property>> {
        if let Some(reference) = &prop.reference {
            let name = ref_name(reference);

            if path.iter().any(|seen| seen == name) {
                return Ok(Some(Property::new_cycle_sentinel(name)));
            }

            let Some(definition) = self.definitions.get(name) else {
                warn!(reference = %name, "dangling reference, omitting property");
                return Ok(None);
            };

            path.push(name.to_string());
            let result = self.inline(definition, path);
            path.pop();

            let Some(mut inlined) = result? else {
                return Ok(None);
            };
            // Local annotations on the referring site win over the
            // definition's own.
            if prop.description.is_some() {
                inlined.description = prop.description.clone();
            }
            if prop.title.is_some() {
                inlined.title = prop.title.clone();
            }
            return Ok(Some(inlined));
        }

        let mut out = prop.clone();

        if let Some(properties) = &prop.properties {
            let mut resolved = OrderedMap::new();
            for (name, child) in properties.iter() {
                match self.inline(child, path)? {
                    Some(child) => resolved.insert(name.clone(), child),
                    None => warn!(property = %name, "dropping child with dangling reference"),
                }
            }
            out.properties = Some(resolved);
        }

        if let Some(patterns) = &prop.pattern_properties {
            let mut resolved = OrderedMap::new();
            for (pattern, child) in patterns.iter() {
                if let Some(child) = self.inline(child, path)? {
                    resolved.insert(pattern.clone(), child);
                }
            }
            out.pattern_properties = Some(resolved);
        }

        if let Some(AdditionalProperties::Schema(child)) = &prop.additional_properties {
            out.additional_properties = self
                .inline(child, path)?
                .map(|c| AdditionalProperties::Schema(Box::new(c)));
        }

        if let Some(items) = &prop.items {
            // A dangling item type leaves the array without items; the
            // normalizer decides what that means.
            out.items = self.inline(items, path)?.map(Box::new);
        }

        if let Some(branches) = &prop.one_of {
            out.one_of = Some(self.inline_branches(branches, path)?);
        }
        if let Some(branches) = &prop.any_of {
            out.any_of = Some(self.inline_branches(branches, path)?);
        }

        Ok(Some(out))
    }

    fn inline_branches(
        &self,
        branches: &[Property],
        path: &mut Vec<String>,
    ) -> Result<Vec<Property>> {
        let mut resolved = Vec::with_capacity(branches.len());
        for branch in branches {
            if let Some(branch) = self.inline(branch, path)? {
                resolved.push(branch);
            }
        }
        Ok(resolved)
    }
}

/// Reduce a reference string to the definition name it points at.
/// References resolve by exact name within the same document; there is no
/// URI resolution.
fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
