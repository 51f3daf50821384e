pub mod article;

pub use article::{ArticleRecord, Thumbnail};
