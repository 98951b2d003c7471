//! wam-validate: connection rules and whole-model validation.
//!
//! Provides:
//! - `RuleTable`: the exact-match connection compatibility matrix. Pairs
//!   with no rule are forbidden; allowed rules may carry extra conditions
//! - `validate_connection`: check one prospective edge before it is added
//! - `validate_model`: full accumulated pass over a model snapshot:
//!   property schemas, stored connections, node fan-out and isolation,
//!   circular references, duplicate edges
//!
//! Validation reports and never repairs: no function here mutates the
//! model it inspects.

mod cycles;
mod duplicates;
mod nodes;
pub mod rules;
pub mod validator;

pub use rules::{ConnectionCheck, ConnectionRule, RuleCondition, RuleTable};
pub use validator::{validate_connection, validate_model};
