pub mod images;
pub mod jwt;
pub mod transliterate;

pub use self::images::*;
pub use self::jwt::*;
pub use self::transliterate::*;
