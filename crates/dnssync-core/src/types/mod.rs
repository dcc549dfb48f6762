mod record;
mod status;

pub use record::*;
pub use status::*;
