//! Kernel of the bookstore backend: the module contract, the registry that
//! drives module lifecycles, layered settings, and the validation rule engine.

pub mod module;
pub mod registry;
pub mod settings;
pub mod validation;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
