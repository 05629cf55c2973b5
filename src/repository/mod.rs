mod data_operations;
mod keyed;

pub use data_operations::DataOperations;
pub use keyed::KeyedDataOperations;
