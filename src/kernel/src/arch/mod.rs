//! Architecture-specific implementations.
//!
//! This module provides platform glue for bare-metal targets. Currently
//! supported: x86_64 PCs. Host builds compile none of it.

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod x86_64;
