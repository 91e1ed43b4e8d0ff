pub mod funcs;
pub mod traits;
