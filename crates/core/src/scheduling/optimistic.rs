/// A value edited locally ahead of the server.
///
/// Holds the last server-confirmed value, an optional local edit and the
/// value of an in-flight write. A successful write promotes the submitted
/// value to `server`; a failed one rolls back to `server`.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    server: T,
    local: Option<T>,
    pending: Option<T>,
}

impl<T: Clone + PartialEq> Optimistic<T> {
    pub fn new(server: T) -> Self {
        Self {
            server,
            local: None,
            pending: None,
        }
    }

    pub fn server(&self) -> &T {
        &self.server
    }

    /// Local edit if any, otherwise the server value.
    pub fn current(&self) -> &T {
        self.local.as_ref().unwrap_or(&self.server)
    }

    pub fn is_dirty(&self) -> bool {
        self.local.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stage(&mut self, value: T) {
        self.local = (value != self.server).then_some(value);
    }

    /// Starts a write of the current value and returns it as the payload.
    /// `None` while another write is still in flight.
    pub fn begin(&mut self) -> Option<T> {
        if self.pending.is_some() {
            return None;
        }
        let submitted = self.current().clone();
        self.pending = Some(submitted.clone());
        Some(submitted)
    }

    pub fn settle_ok(&mut self) {
        if let Some(submitted) = self.pending.take() {
            if self.local.as_ref() == Some(&submitted) {
                self.local = None;
            }
            self.server = submitted;
        }
    }

    pub fn settle_err(&mut self) {
        if self.pending.take().is_some() {
            self.local = None;
        }
    }

    pub fn discard(&mut self) {
        self.local = None;
    }
}
