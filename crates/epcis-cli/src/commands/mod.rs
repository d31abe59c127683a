pub mod canonicalize;
pub mod expand;
pub mod hash;
pub mod normalize;
pub mod resolve;
