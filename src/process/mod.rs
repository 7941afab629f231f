pub mod decode;
pub mod row;

pub use decode::decode;
pub use row::{tolerant_zip, DecodedRow};
