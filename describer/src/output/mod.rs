pub mod diagnostics;
pub mod frame;
pub mod trail;
