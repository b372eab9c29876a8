//! Directional connection points derived from leaf props

use serde::{Deserialize, Serialize};

/// Socket direction. Output sockets expose vendor-emitted values; input
/// sockets accept user-settable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketKind {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketArity {
    One,
    Many,
}

/// A named, directional endpoint referencing exactly one leaf prop by name.
/// The socket does not own the prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketSpec {
    pub name: String,
    pub kind: SocketKind,
    pub arity: SocketArity,
    /// Slash-joined path of the prop this socket connects to.
    pub prop_path: String,
}

impl SocketSpec {
    pub fn new(name: &str, kind: SocketKind, prop_path: String) -> Self {
        Self {
            name: name.to_string(),
            kind,
            arity: SocketArity::One,
            prop_path,
        }
    }
}
