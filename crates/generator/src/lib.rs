//! Derived-artifact generation for asset specs
//!
//! This crate turns finished prop trees into the artifacts attached to a
//! schema variant: directional sockets, the default func set (CRUD actions,
//! code generation, management), and the asset-definition source text.

mod asset_builder;
mod funcs;
mod sockets;
mod templates;

pub use asset_builder::AssetFuncGenerator;
pub use funcs::{
    generate_action_funcs, generate_code_gen_func, generate_intrinsic_funcs,
    generate_management_funcs,
};
pub use sockets::derive_sockets;
