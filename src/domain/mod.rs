pub mod entities;
pub mod headers;
pub mod policy;
pub mod value_objects;

pub use entities::{Request, Response};
pub use headers::Headers;
pub use policy::{ExecutionPolicy, RedirectPolicy};
pub use value_objects::{Body, Method, Url};
