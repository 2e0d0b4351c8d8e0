//! List-like structures: segmented big arrays and front-coded lists of arrays.

pub mod big_array;
pub mod front_coded;

pub use big_array::BigVec;
pub use front_coded::FrontCodedList;
