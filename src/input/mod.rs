mod velocity;
pub use velocity::*;

mod gesture;
pub use gesture::*;
