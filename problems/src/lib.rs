//! Stable problem codes for the ferroplc analysis front end.
//!
//! The `Problem` enumeration is generated at build time from
//! `resources/problem-codes.csv`. Each problem has a stable code (shown to
//! users and kept consistent between releases) and a constant message.

include!(concat!(env!("OUT_DIR"), "/problems.rs"));
