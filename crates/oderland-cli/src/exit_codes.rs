//! Exit codes for the `oderland` binary. Every failure is fatal to the
//! invocation; nothing is retried, so two codes suffice.

pub const SUCCESS: i32 = 0;
pub const FATAL: i32 = 1;
