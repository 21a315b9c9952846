pub use watchdog_types::prelude::*;

// vim: ts=4
