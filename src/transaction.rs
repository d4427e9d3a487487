//! Traced transaction wrapper.

use std::fmt;
use std::sync::Arc;

use tracing::{Instrument, Span};

use crate::driver::Transaction;
use crate::error::Error;
use crate::tracer::Tracer;

/// An open transaction whose span lives from `begin` until the first commit
/// or rollback.
///
/// Whichever of [`TracedTransaction::commit`] / [`TracedTransaction::rollback`]
/// runs first takes the span, records the delegate outcome on it, and lets
/// it close; the underlying result propagates verbatim. A second call finds
/// no span and is passed straight through to the underlying driver, whose
/// own "already closed" error (if any) stands; this wrapper adds no guard.
/// Dropping a still-open transaction closes the span with it.
pub struct TracedTransaction {
    inner: Box<dyn Transaction>,
    tracer: Arc<Tracer>,
    span: Option<Span>,
}

impl TracedTransaction {
    pub(crate) fn new(inner: Box<dyn Transaction>, tracer: Arc<Tracer>, span: Span) -> Self {
        Self {
            inner,
            tracer,
            span: Some(span),
        }
    }

    /// Commit the transaction.
    pub async fn commit(&mut self) -> Result<(), Error> {
        match self.span.take() {
            Some(span) => {
                let result = self.inner.commit().instrument(span.clone()).await;
                self.tracer.finish_span(&span, &result);
                result
            }
            None => self.inner.commit().await,
        }
    }

    /// Roll the transaction back.
    pub async fn rollback(&mut self) -> Result<(), Error> {
        match self.span.take() {
            Some(span) => {
                let result = self.inner.rollback().instrument(span.clone()).await;
                self.tracer.finish_span(&span, &result);
                result
            }
            None => self.inner.rollback().await,
        }
    }
}

impl fmt::Debug for TracedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedTransaction")
            .field("open", &self.span.is_some())
            .finish_non_exhaustive()
    }
}
