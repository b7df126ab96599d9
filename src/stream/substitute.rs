//! Literal search-and-replace over a chunked byte stream.

use bytes::{Bytes, BytesMut};
use memchr::memmem::Finder;

/// Incremental literal substitution.
///
/// Feed chunks with [`push`](Self::push) and call [`finish`](Self::finish)
/// once the input ends. Matches are found left to right without overlap, and
/// a match split over any number of chunks is still replaced. Between calls
/// at most `search.len() - 1` bytes are held back: the longest tail that
/// could still grow into a match.
#[derive(Debug, Clone)]
pub struct Substitution {
    finder: Finder<'static>,
    replacement: Bytes,
    pending: BytesMut,
}

impl Substitution {
    pub fn new(search: impl AsRef<[u8]>, replacement: impl Into<Bytes>) -> Self {
        Self {
            finder: Finder::new(search.as_ref()).into_owned(),
            replacement: replacement.into(),
            pending: BytesMut::new(),
        }
    }

    pub fn search(&self) -> &[u8] {
        self.finder.needle()
    }

    /// Bytes currently held back waiting for the next chunk.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consume `chunk` and return everything that can be emitted so far.
    ///
    /// The result may be empty when the whole chunk could be the start of a
    /// match.
    pub fn push(&mut self, chunk: &[u8]) -> Bytes {
        let needle_len = self.finder.needle().len();
        if needle_len == 0 {
            return Bytes::copy_from_slice(chunk);
        }

        self.pending.extend_from_slice(chunk);
        let input = self.pending.split().freeze();

        let mut out = BytesMut::with_capacity(input.len());
        let mut pos = 0;
        for start in self.finder.find_iter(&input) {
            out.extend_from_slice(&input[pos..start]);
            out.extend_from_slice(&self.replacement);
            pos = start + needle_len;
        }

        let keep = partial_match(&input[pos..], self.finder.needle());
        let end = input.len() - keep;
        out.extend_from_slice(&input[pos..end]);
        self.pending.extend_from_slice(&input[end..]);

        out.freeze()
    }

    /// End of input: release the held-back tail. It never contains a match.
    pub fn finish(&mut self) -> Bytes {
        self.pending.split().freeze()
    }

    /// Drop the held-back tail without emitting it.
    pub fn discard(&mut self) {
        self.pending.clear();
    }
}

/// Length of the longest suffix of `tail` that is a proper prefix of `needle`.
fn partial_match(tail: &[u8], needle: &[u8]) -> usize {
    let max = needle.len().saturating_sub(1).min(tail.len());
    (1..=max)
        .rev()
        .find(|&len| tail.ends_with(&needle[..len]))
        .unwrap_or(0)
}
