pub mod climb;
pub mod macros;
pub mod time;

pub use climb::*;
pub use time::*;

crate::define_id_type!(i64, SessionId);
crate::define_id_type!(i64, ClimbId);
