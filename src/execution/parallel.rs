//! Row-parallel execution.
//!
//! The only concurrency primitive in the crate. A half-open row range is cut
//! into at most `workers` contiguous chunks, each chunk runs as its own rayon
//! task inside a scope, and the call returns once every chunk is done.
//! Nothing is kept between calls.
//!
//! [`parallelize_rows`] hands each task a row band of a mutable raster view.
//! Bands come from [`RasterViewMut::split_at_row`], so workers write through
//! disjoint `&mut` slices and no locking is involved.

use crate::core::raster::RasterViewMut;
use std::ops::Range;

/// Split `[start, stop)` into `min(max(workers, 1), stop - start)` contiguous
/// chunks whose lengths differ by at most one.
///
/// An empty or inverted range yields no chunks.
pub fn partition(workers: usize, start: i32, stop: i32) -> Vec<Range<i32>> {
    if stop <= start {
        return Vec::new();
    }
    let count = (i64::from(stop) - i64::from(start)) as usize;
    let chunks = workers.clamp(1, count);
    let base = count / chunks;
    let extra = count % chunks;

    let mut ranges = Vec::with_capacity(chunks);
    let mut lo = start;
    for i in 0..chunks {
        let len = base + usize::from(i < extra);
        let hi = lo + len as i32;
        ranges.push(lo..hi);
        lo = hi;
    }
    ranges
}

/// Run `work(chunk_start, chunk_stop)` over the partition of `[start, stop)`.
///
/// Chunks run concurrently with no ordering between them; the call blocks
/// until all of them have finished.
pub fn parallelize<F>(workers: usize, start: i32, stop: i32, work: F)
where
    F: Fn(i32, i32) + Sync,
{
    let chunks = partition(workers, start, stop);
    if chunks.len() <= 1 {
        if let Some(only) = chunks.first() {
            work(only.start, only.end);
        }
        return;
    }

    let work = &work;
    rayon::scope(|s| {
        for chunk in chunks {
            s.spawn(move |_| work(chunk.start, chunk.end));
        }
    });
}

/// Run `work(band)` for every row band of `view`, bands following
/// [`partition`] of the view's rows.
pub fn parallelize_rows<'a, F>(workers: usize, view: RasterViewMut<'a>, work: F)
where
    F: Fn(RasterViewMut<'a>) + Sync,
{
    let rows = view.bounds();
    let chunks = partition(workers, rows.min.y, rows.max.y);
    if chunks.len() <= 1 {
        if !chunks.is_empty() {
            work(view);
        }
        return;
    }

    let mut bands = Vec::with_capacity(chunks.len());
    let mut rest = view;
    for chunk in &chunks[..chunks.len() - 1] {
        let (band, tail) = rest.split_at_row(chunk.end);
        bands.push(band);
        rest = tail;
    }
    bands.push(rest);

    let work = &work;
    rayon::scope(|s| {
        for band in bands {
            s.spawn(move |_| work(band));
        }
    });
}
