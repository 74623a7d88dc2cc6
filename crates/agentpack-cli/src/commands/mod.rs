pub mod check;
pub mod normalize;
pub mod overlay;
