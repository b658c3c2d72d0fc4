//! Deferred registration
//!
//! rustdoc's data files hand their payload to a page-level hook if the page
//! has installed one, and otherwise park it in a single pending slot that the
//! hook drains once it is installed. [`DeferredRegistry`] is that pair of
//! slots as an explicit value instead of two window globals.

use std::fmt::{self, Debug, Formatter};

/// A handler that consumes one payload at a time
pub type Handler<'a, P> = Box<dyn FnMut(P) + 'a>;

/// Whether a registration handler is currently available
pub enum Registration<'a, P> {
    Unset,
    Set(Handler<'a, P>),
}

impl<P> Registration<'_, P> {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

impl<P> Default for Registration<'_, P> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<P> Debug for Registration<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Set(_) => f.write_str("Set(..)"),
        }
    }
}

/// What happened to a submitted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The installed handler was called with it
    Delivered,
    /// No handler was installed; it now sits in the pending slot.
    /// `replaced` is true when an earlier unconsumed payload was overwritten.
    Deferred { replaced: bool },
}

/// Holds either a registration handler or the one payload waiting for it
pub struct DeferredRegistry<'a, P> {
    registration: Registration<'a, P>,
    pending: Option<P>,
}

impl<P> Default for DeferredRegistry<'_, P> {
    fn default() -> Self {
        Self {
            registration: Registration::Unset,
            pending: None,
        }
    }
}

impl<P: Debug> Debug for DeferredRegistry<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredRegistry")
            .field("registration", &self.registration)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<'a, P> DeferredRegistry<'a, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand `payload` to the installed handler, or park it until one arrives
    pub fn submit(&mut self, payload: P) -> Submission {
        match &mut self.registration {
            Registration::Set(handler) => {
                handler(payload);
                Submission::Delivered
            }
            Registration::Unset => {
                let replaced = self.pending.replace(payload).is_some();
                if replaced {
                    log::debug!("overwrote an unconsumed pending payload");
                }
                Submission::Deferred { replaced }
            }
        }
    }

    /// Install `handler`, draining the pending slot into it.
    ///
    /// Returns true if a pending payload was delivered.
    pub fn install(&mut self, handler: impl FnMut(P) + 'a) -> bool {
        let mut handler: Handler<'a, P> = Box::new(handler);
        let drained = match self.pending.take() {
            Some(payload) => {
                log::debug!("delivering pending payload to newly installed handler");
                handler(payload);
                true
            }
            None => false,
        };
        self.registration = Registration::Set(handler);
        drained
    }

    /// Remove the handler; later submissions are deferred again
    pub fn uninstall(&mut self) -> Registration<'a, P> {
        std::mem::take(&mut self.registration)
    }

    pub fn is_installed(&self) -> bool {
        self.registration.is_set()
    }

    pub fn pending(&self) -> Option<&P> {
        self.pending.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<P> {
        self.pending.take()
    }
}
