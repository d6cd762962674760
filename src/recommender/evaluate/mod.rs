pub mod aggregate;
pub mod ranking;
pub mod similarity;
