//! Command surfaces over the reconciliation core.

pub mod ci;
pub mod create;
pub mod env;
pub mod lint;
