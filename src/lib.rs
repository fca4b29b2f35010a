pub mod codec;
pub mod crypto;
pub mod dictionary;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod value;

pub use codec::{Compression, Encryption};
pub use dictionary::Dictionary;
pub use envelope::Metadata;
pub use error::{Error, Result};
pub use store::{ConfigStore, NewOptions, StoreInfo};
pub use value::{ArrayValue, Element, ElementKind, Value};
