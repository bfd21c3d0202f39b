//! Paged row fetching.
//!
//! Upstream row sources (a managed SQL store behind an API, in production)
//! return bounded-size pages. `PagedFetch` merges successive pages into one
//! ordered sequence so no component downstream has to assume the source can
//! return unbounded results in a single call.
//!
//! Contract:
//!
//! - pages are requested 0, 1, 2, ... with a fixed `page_size`
//! - rows are yielded in page-emission order, never reordered
//! - a page shorter than `page_size` signals exhaustion; no further page
//!   is requested after it
//! - an optional total-row cap stops the fetch early
//! - any failing page request aborts the whole fetch — no partial silent
//!   results

use tracing::debug;

use crate::error::EngineError;

/// A source of bounded-size pages of rows.
///
/// Implementations typically wrap a blocking network or database call.
/// `fetch_page` must return at most `page_size` rows; returning fewer marks
/// the source as exhausted.
pub trait PageSource {
    type Row;

    /// Fetch the 0-indexed `page` of up to `page_size` rows.
    fn fetch_page(&mut self, page: usize, page_size: usize) -> Result<Vec<Self::Row>, EngineError>;
}

/// Streaming iterator over all rows of a `PageSource`.
///
/// Yields `Result<Row, EngineError>`; after the first `Err` (or after
/// exhaustion) the iterator is fused and issues no further page requests.
#[derive(Debug)]
pub struct PagedFetch<S: PageSource> {
    source: S,
    page_size: usize,
    max_rows: Option<usize>,
    next_page: usize,
    yielded: usize,
    buffer: std::vec::IntoIter<S::Row>,
    done: bool,
}

impl<S: PageSource> PagedFetch<S> {
    pub fn new(source: S, page_size: usize) -> Result<Self, EngineError> {
        if page_size == 0 {
            return Err(EngineError::InvalidParameter(
                "page size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            source,
            page_size,
            max_rows: None,
            next_page: 0,
            yielded: 0,
            buffer: Vec::new().into_iter(),
            done: false,
        })
    }

    /// Stop after at most `max_rows` rows, even if the source has more.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Materialize every remaining row, aborting on the first failure.
    pub fn collect_rows(self) -> Result<Vec<S::Row>, EngineError> {
        self.collect()
    }

    fn refill(&mut self) -> Result<(), EngineError> {
        let page = self.next_page;
        let rows = self.source.fetch_page(page, self.page_size)?;
        debug!(page, returned = rows.len(), page_size = self.page_size, "fetched page");

        if rows.len() < self.page_size {
            // Short page: the source is exhausted after this one.
            self.done = true;
        }
        self.next_page += 1;
        self.buffer = rows.into_iter();
        Ok(())
    }
}

impl<S: PageSource> Iterator for PagedFetch<S> {
    type Item = Result<S::Row, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(cap) = self.max_rows {
            if self.yielded >= cap {
                self.done = true;
                return None;
            }
        }

        if let Some(row) = self.buffer.next() {
            self.yielded += 1;
            return Some(Ok(row));
        }

        if self.done {
            return None;
        }

        if let Err(err) = self.refill() {
            self.done = true;
            return Some(Err(err));
        }

        match self.buffer.next() {
            Some(row) => {
                self.yielded += 1;
                Some(Ok(row))
            }
            // Empty page: exhaustion with nothing left to yield.
            None => None,
        }
    }
}

/// Fetch every row of `source` in one call.
pub fn fetch_all<S: PageSource>(source: S, page_size: usize) -> Result<Vec<S::Row>, EngineError> {
    PagedFetch::new(source, page_size)?.collect_rows()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test source backed by a vector, counting page calls and optionally
    /// failing a specific page.
    #[derive(Debug)]
    struct VecSource {
        rows: Vec<u32>,
        calls: usize,
        fail_page: Option<usize>,
    }

    impl VecSource {
        fn new(n: u32) -> Self {
            Self {
                rows: (0..n).collect(),
                calls: 0,
                fail_page: None,
            }
        }
    }

    impl PageSource for VecSource {
        type Row = u32;

        fn fetch_page(&mut self, page: usize, page_size: usize) -> Result<Vec<u32>, EngineError> {
            self.calls += 1;
            if self.fail_page == Some(page) {
                return Err(EngineError::Fetch(format!("page {page} unavailable")));
            }
            let start = (page * page_size).min(self.rows.len());
            let end = (start + page_size).min(self.rows.len());
            Ok(self.rows[start..end].to_vec())
        }
    }

    #[test]
    fn five_rows_at_page_size_two_take_three_calls() {
        let mut fetch = PagedFetch::new(VecSource::new(5), 2).unwrap();
        let rows: Vec<u32> = fetch.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
        // 3 pages of (2, 2, 1); the short last page stops the loop, so no
        // 4th call is ever issued.
        assert_eq!(fetch.source.calls, 3);
    }

    #[test]
    fn exact_multiple_needs_one_trailing_empty_page() {
        let mut fetch = PagedFetch::new(VecSource::new(4), 2).unwrap();
        let rows: Vec<u32> = fetch.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(rows, vec![0, 1, 2, 3]);
        // Pages of (2, 2) give no exhaustion signal; the empty 3rd page does.
        assert_eq!(fetch.source.calls, 3);
    }

    #[test]
    fn max_rows_cap_stops_early() {
        let mut fetch = PagedFetch::new(VecSource::new(100), 10)
            .unwrap()
            .with_max_rows(25);
        let rows: Vec<u32> = fetch.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 25);
        assert_eq!(rows[24], 24);
        assert_eq!(fetch.source.calls, 3);
    }

    #[test]
    fn failing_page_aborts_without_partial_results() {
        let mut source = VecSource::new(10);
        source.fail_page = Some(1);

        let err = fetch_all(source, 4).unwrap_err();
        assert!(matches!(err, EngineError::Fetch(_)));
    }

    #[test]
    fn iterator_is_fused_after_error() {
        let mut source = VecSource::new(10);
        source.fail_page = Some(0);

        let mut fetch = PagedFetch::new(source, 4).unwrap();
        assert!(matches!(fetch.next(), Some(Err(EngineError::Fetch(_)))));
        assert!(fetch.next().is_none());
        assert_eq!(fetch.source.calls, 1);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = PagedFetch::new(VecSource::new(1), 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn streaming_consumption_preserves_order() {
        let fetch = PagedFetch::new(VecSource::new(7), 3).unwrap();
        let mut last = None;
        for row in fetch {
            let row = row.unwrap();
            if let Some(prev) = last {
                assert!(row > prev);
            }
            last = Some(row);
        }
        assert_eq!(last, Some(6));
    }
}
