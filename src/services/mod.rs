//! Resource facades.
//!
//! Each facade maps domain calls to an operation name, HTTP method and path
//! relative to the service prefix. Identifiers are percent-encoded; nothing
//! else happens here.

pub mod authors;
pub mod books;
pub mod customers;
pub mod inventory;
pub mod orders;

pub use authors::AuthorsClient;
pub use books::BooksClient;
pub use customers::CustomersClient;
pub use inventory::InventoryClient;
pub use orders::OrdersClient;
