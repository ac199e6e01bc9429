mod math;
#[allow(clippy::module_inception)]
mod value;

pub use math::{Color, Quat, Vec3};
pub use value::{Value, ValueTag};
