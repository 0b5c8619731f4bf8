#![forbid(unsafe_code)]

//! Terminal presentation: view models built from service outcomes and pure
//! render functions that turn them into text.

pub mod views;
pub mod vm;
