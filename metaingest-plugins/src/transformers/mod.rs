//! Built-in transformers.

pub mod add_dataset_ownership;
pub mod add_dataset_tags;

pub use add_dataset_ownership::{
    AddDatasetOwnership, AddDatasetOwnershipFactory, SimpleAddDatasetOwnership,
    SimpleAddDatasetOwnershipConfig, SimpleAddDatasetOwnershipFactory,
};
pub use add_dataset_tags::{
    AddDatasetTags, AddDatasetTagsFactory, PatternAddDatasetTags, PatternAddDatasetTagsConfig,
    PatternAddDatasetTagsFactory, SimpleAddDatasetTags, SimpleAddDatasetTagsConfig,
    SimpleAddDatasetTagsFactory, TagRule,
};
