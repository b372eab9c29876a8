//! Socket derivation
//!
//! Sockets are directional connection points derived from the direct
//! children of an object node. Only scalar children are eligible; a
//! composite property never becomes a socket.

use asset_spec_generator_common::{PropSpec, SocketArity, SocketKind, SocketSpec};

/// Derive sockets from an object node's direct children.
///
/// Read-only children become output sockets (the vendor emits the value);
/// write-only children that are not also read-only become input sockets.
/// A child with neither flag derives nothing.
///
/// Names follow the property name and are deliberately not de-duplicated:
/// the same name arising from both the domain and the resource-value tree
/// is how a user-settable input later wires to the matching vendor output.
pub fn derive_sockets(root: &PropSpec) -> Vec<SocketSpec> {
    let mut sockets = Vec::new();
    for child in root.entries() {
        if !child.kind.is_scalar() {
            continue;
        }
        if child.metadata.read_only {
            sockets.push(SocketSpec {
                name: child.name.clone(),
                kind: SocketKind::Output,
                arity: SocketArity::Many,
                prop_path: child.path_str(),
            });
        } else if child.metadata.write_only {
            sockets.push(SocketSpec::new(
                &child.name,
                SocketKind::Input,
                child.path_str(),
            ));
        }
    }
    sockets
}
