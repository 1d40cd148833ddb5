mod catalog;
mod dataset;

pub use catalog::ItemCatalog;
pub(crate) use dataset::is_sorted_subset;
pub use dataset::{ClassId, EncodedDataset, Item};
