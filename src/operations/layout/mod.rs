mod relax;

pub use relax::{Relax, RelaxReport};
