// ============================================================================
// Unit Conversion
// Quantity parsing and time-unit conversion factors
// ============================================================================
//
// This module provides:
// - parse_quantity: "1.5ms", "100 ps", "2e-3", "1min 30s"
// - conversion_factor / convert_unit: exact factors between time units
//
// All arithmetic is done in rust_decimal so that power-of-ten rescaling
// never picks up binary floating-point error.

mod quantity;

pub use quantity::{conversion_factor, convert_unit, parse_quantity, Quantity};
