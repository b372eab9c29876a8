//! Generated behavior definitions attached to a schema variant

use crate::new_unique_id;
use serde::{Deserialize, Serialize};

/// CRUD actions a resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Create,
    Refresh,
    Update,
    Delete,
}

impl ActionKind {
    pub fn handler(&self) -> &'static str {
        match self {
            ActionKind::Create => "resourceCreate",
            ActionKind::Refresh => "resourceRefresh",
            ActionKind::Update => "resourceUpdate",
            ActionKind::Delete => "resourceDelete",
        }
    }
}

/// Management behaviors operating outside the CRUD lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagementKind {
    Discover,
    Import,
}

impl ManagementKind {
    pub fn handler(&self) -> &'static str {
        match self {
            ManagementKind::Discover => "resourceDiscover",
            ManagementKind::Import => "resourceImport",
        }
    }
}

/// What a generated func does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "funcKind", rename_all = "camelCase")]
pub enum FuncKind {
    Action { action: ActionKind },
    CodeGeneration,
    Management { management: ManagementKind },
    Intrinsic,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuncArgumentKind {
    Object,
    String,
    Array,
}

/// One argument of a generated func, optionally wired to a prop by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncArgumentSpec {
    pub name: String,
    pub kind: FuncArgumentKind,
    pub prop_unique_id: Option<String>,
}

/// A generated behavior: action, code generation, management, intrinsic,
/// or asset-definition source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncSpec {
    pub name: String,
    pub display_name: String,
    pub unique_id: String,
    pub kind: FuncKind,
    /// Entry point in the vendor runtime that executes this func.
    pub handler: String,
    /// Generated source text, present only for asset funcs.
    pub code: Option<String>,
    pub arguments: Vec<FuncArgumentSpec>,
}

impl FuncSpec {
    pub fn new(name: &str, display_name: &str, kind: FuncKind, handler: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            unique_id: new_unique_id(),
            kind,
            handler: handler.to_string(),
            code: None,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: FuncArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }
}
