//! Configuration for the declaration pass.

/// Options controlling a [`DeclarationPass`](crate::DeclarationPass).
///
/// # Example
///
/// ```
/// use tern_compiler::DeclarationOptions;
///
/// let options = DeclarationOptions::new().verbose(true).drain_specializations(false);
/// assert!(options.is_verbose());
/// assert!(!options.drains_specializations());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationOptions {
    verbose: bool,
    drain_specializations: bool,
}

impl DeclarationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit declaration events at `info` level instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether queued call-site specializations are realized before the pass
    /// returns. When disabled the unrealized ones are handed back in
    /// [`DeclarationOutput::pending_specializations`](crate::DeclarationOutput::pending_specializations)
    /// for [`DeclarationPass::drain`](crate::DeclarationPass::drain).
    pub fn drain_specializations(mut self, drain: bool) -> Self {
        self.drain_specializations = drain;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn drains_specializations(&self) -> bool {
        self.drain_specializations
    }
}

impl Default for DeclarationOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            drain_specializations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_drain_quietly() {
        let options = DeclarationOptions::default();
        assert!(!options.is_verbose());
        assert!(options.drains_specializations());
    }
}
