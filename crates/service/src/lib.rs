pub mod cache;
pub mod errors;
pub mod object;
pub mod readiness;
pub mod runtime;
pub mod selftest;
