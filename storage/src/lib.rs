mod constants;
pub mod errors;
pub mod file_store;
pub mod mongo;
pub mod templates;
pub mod traits;

pub use file_store::FileStore;
pub use mongo::connector::MongoStore;
pub use templates::TemplateLibrary;
pub use traits::Store;
