//! Raw star catalog readers.

pub mod xephem;
