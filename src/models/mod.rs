mod article;

pub use article::{ArticleRecord, StoredArticle};
