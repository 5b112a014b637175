// Portfolio-mon schema - shared static data definitions.
// Everything in here is read-only template data: the type chart, move and
// mon templates, and item definitions. Runtime battle state lives in the
// main crate.

pub use battle_data::*;
pub use mon_data::*;
pub use mon_types::*;

pub mod battle_data;
pub mod mon_data;
pub mod mon_types;
