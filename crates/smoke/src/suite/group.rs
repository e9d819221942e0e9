//! GitHub Actions log groups.
//!
//! <https://docs.github.com/actions/using-workflows/workflow-commands-for-github-actions#grouping-log-lines>

use std::io::{self, Stdout, Write};

/// Open log group; the group is closed when this is dropped.
pub struct LogGroup<W: Write = Stdout> {
    out: W,
    open: bool,
}

impl LogGroup<Stdout> {
    /// Open a group named `name` on stdout if `enabled`.
    #[must_use]
    pub fn open(enabled: bool, name: &str) -> Self {
        Self::open_in(io::stdout(), enabled, name)
    }
}

impl<W: Write> LogGroup<W> {
    /// Open a group named `name` on `out` if `enabled`.
    pub fn open_in(mut out: W, enabled: bool, name: &str) -> Self {
        if enabled {
            let _ = write!(out, "\n::group::{name}\n");
            let _ = out.flush();
        }
        Self { out, open: enabled }
    }
}

impl<W: Write> Drop for LogGroup<W> {
    fn drop(&mut self) {
        if self.open {
            let _ = write!(self.out, "\n::endgroup::\n");
            let _ = self.out.flush();
        }
    }
}
