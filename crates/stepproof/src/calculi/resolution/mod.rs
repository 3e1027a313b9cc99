pub mod prop;
mod util;

pub use prop::PropResolution as Prop;
