pub mod enquiry;
pub mod session;

pub use self::enquiry::*;
pub use self::session::*;
