//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS
//! 2. Cache-Control override
//! 3. Audit logger

pub mod audit;
