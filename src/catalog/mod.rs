pub mod carousel;
pub mod category_tree;
pub mod request_guard;
pub mod view_model;

pub use self::carousel::*;
pub use self::category_tree::*;
pub use self::request_guard::*;
pub use self::view_model::*;
