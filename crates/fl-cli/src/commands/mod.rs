//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod down;
pub(crate) mod executed;
pub(crate) mod pending;
pub(crate) mod repair;
pub(crate) mod up;
