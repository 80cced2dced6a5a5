pub mod pagination;
pub mod response;
pub mod validation;

pub use pagination::{PageMeta, PageParams, Paginated};
pub use response::{created, message, ok};
pub use validation::Validator;
