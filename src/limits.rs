//! Hard limits of the interpreter.

/// Maximum size of a string value in bytes, including the reserved
/// terminator slot; stored text is capped at `MAX_STRING_LEN - 1` bytes.
pub const MAX_STRING_LEN: usize = 1024;

/// Maximum number of elements `array(n)` may allocate.
pub const MAX_ARRAY_SIZE: usize = 10_000;

/// Maximum number of nested function calls.
pub const MAX_CALL_DEPTH: usize = 100;

/// Maximum number of user-defined functions.
pub const MAX_FUNCS: usize = 100;

/// Maximum number of parameters per function.
pub const MAX_PARAMS: usize = 10;

/// Number of reported errors after which execution stops.
pub const MAX_ERRORS: usize = 10;
