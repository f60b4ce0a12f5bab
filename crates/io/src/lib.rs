//! formgrid-io: getting data in and out of sheets.

pub mod csv;
pub mod json;
pub mod rows;
