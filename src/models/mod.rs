mod member;
mod payment;

pub use member::*;
pub use payment::*;
