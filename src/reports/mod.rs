// Report module - console table rendering and xlsx workbook output

pub mod console;
pub mod workbook;
