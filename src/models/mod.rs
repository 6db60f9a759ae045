pub mod request;
pub mod response;
pub mod schema;
pub mod vat_return;

pub use request::*;
pub use response::*;
pub use schema::*;
pub use vat_return::*;
