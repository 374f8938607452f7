mod catalog;
mod ocr;
mod pdf_source;
mod persist;
mod run;

pub use run::run;
