//! Book store backend: a catalog of books and orders placed against it.

pub mod app;
pub mod modules;
