// ============================================================================
// Interfaces Module
// Contracts for the collaborators SimTime interoperates with
// ============================================================================

mod param;

pub use param::{NumericParam, Param, ParamKind, ParamValue};
