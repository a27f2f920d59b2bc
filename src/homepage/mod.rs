mod extractor;
mod fetcher;

pub use extractor::extract;
pub use fetcher::HomepageFetcher;

#[cfg(test)]
pub(crate) use fetcher::testing;
