//! Command implementations and terminal rendering.

pub mod report;
pub mod track;
pub mod trends;
pub mod ui;
