pub mod category;
pub mod enquiry;
pub mod news;
pub mod product;
pub mod reference;
pub mod stats;
pub mod user;

pub use self::category::*;
pub use self::enquiry::*;
pub use self::news::*;
pub use self::product::*;
pub use self::reference::*;
pub use self::stats::*;
pub use self::user::*;
