pub mod complaint;
pub mod tracking;
