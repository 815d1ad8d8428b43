pub mod traits;
pub mod types;

pub mod reassembler;
pub mod record;
pub mod stream;

#[cfg(test)]
mod reassembler_tests;
#[cfg(test)]
mod stream_tests;

pub use reassembler::*;
pub use stream::*;
pub use traits::*;
pub use types::*;
