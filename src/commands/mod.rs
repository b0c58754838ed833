//! Command bodies shared by the `boof` and `brain2bool` binaries.

pub mod run;
pub mod translate;
