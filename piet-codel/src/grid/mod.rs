pub mod image;
pub mod estimate;
pub mod resample;
pub mod region;
pub mod store;
