//! Sequences of value sets, one per repetition of a subsection.

use anyhow::Result;

use crate::values::ValueSet;

/// The rows of a subsection. Every call to `each` has to visit the
/// same rows in the same order; implementations may produce them on
/// the fly instead of holding them in memory.
pub trait ValueStream {
    /// Call `f` with every row in order, stopping at the first error.
    fn each(&self, f: &mut dyn FnMut(&ValueSet<'_>) -> Result<()>) -> Result<()>;

    fn count(&self) -> Result<usize> {
        let mut n = 0;
        self.each(&mut |_| {
            n += 1;
            Ok(())
        })?;
        Ok(n)
    }
}

/// The stream of a subsection that was never bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyStream;

impl ValueStream for EmptyStream {
    fn each(&self, _f: &mut dyn FnMut(&ValueSet<'_>) -> Result<()>) -> Result<()> {
        Ok(())
    }
}

/// Rows held in memory.
#[derive(Debug, Default)]
pub struct ValueSeries<'s>(pub Vec<ValueSet<'s>>);

impl<'s> ValueStream for ValueSeries<'s> {
    fn each(&self, f: &mut dyn FnMut(&ValueSet<'_>) -> Result<()>) -> Result<()> {
        for row in &self.0 {
            f(row)?;
        }
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.0.len())
    }
}

impl<'s> From<Vec<ValueSet<'s>>> for ValueSeries<'s> {
    fn from(rows: Vec<ValueSet<'s>>) -> Self {
        ValueSeries(rows)
    }
}

/// Rows produced on demand: `generate` is called on every restart
/// and has to return an iterator over the same rows each time. Items
/// are results so that a source loading rows lazily can fail.
pub struct GeneratedStream<F> {
    generate: F,
}

impl<F> GeneratedStream<F> {
    pub fn new(generate: F) -> Self {
        GeneratedStream { generate }
    }
}

impl<'s, F, I> ValueStream for GeneratedStream<F>
    where F: Fn() -> I,
          I: Iterator<Item = Result<ValueSet<'s>>>
{
    fn each(&self, f: &mut dyn FnMut(&ValueSet<'_>) -> Result<()>) -> Result<()> {
        for row in (self.generate)() {
            f(&row?)?;
        }
        Ok(())
    }
}
