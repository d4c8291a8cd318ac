use crate::error::Result;
use std::io::Read;

/// A response body being read from the store.
pub struct Resource<'a> {
    pub body: Box<dyn Read + 'a>,
    /// Length advertised by the server, if any.
    pub content_length: Option<u64>,
}

impl<'a> Resource<'a> {
    pub fn new<R: Read + 'a>(body: R, content_length: Option<u64>) -> Self {
        Self {
            body: Box::new(body),
            content_length,
        }
    }
}

/// An authenticated transport the download pipeline reads resources through.
///
/// Failures to reach the resource are reported as `ShelfError::Transport`.
pub trait Session {
    fn get(&self, url: &str) -> Result<Resource<'_>>;
}

impl<S: Session + ?Sized> Session for &S {
    fn get(&self, url: &str) -> Result<Resource<'_>> {
        (**self).get(url)
    }
}
