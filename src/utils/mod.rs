pub mod normalizer;
pub mod sort;
