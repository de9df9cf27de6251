pub use self::{board::*, catalog::*};

pub(crate) mod board;
pub(crate) mod catalog;
