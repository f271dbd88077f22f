pub mod excel;
pub mod summary;

pub use excel::export;
pub use summary::summarize;
