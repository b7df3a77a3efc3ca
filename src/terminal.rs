//! Terminal State
//!
//! Ctrl-C during a prompt ends the run. Prompts may leave the terminal with
//! echo off or the cursor hidden, so the settings seen at startup are put
//! back before exiting.

use console::Term;

/// Terminal settings captured before any prompt runs
#[derive(Clone, Copy)]
pub struct TerminalState {
    #[cfg(unix)]
    termios: Option<libc::termios>,
}

impl TerminalState {
    /// Snapshot the settings of stdin, if it is a terminal
    pub fn capture() -> Self {
        #[cfg(unix)]
        {
            let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
            // SAFETY: tcgetattr only writes into the struct it is given
            let rc = unsafe { libc::tcgetattr(libc::STDIN_FILENO, termios.as_mut_ptr()) };
            // SAFETY: a zero return means the struct was filled in
            let termios = (rc == 0).then(|| unsafe { termios.assume_init() });
            Self { termios }
        }

        #[cfg(not(unix))]
        Self {}
    }

    /// A state that restores nothing but the cursor
    pub fn detached() -> Self {
        Self {
            #[cfg(unix)]
            termios: None,
        }
    }

    /// Whether terminal settings were captured
    pub fn is_captured(&self) -> bool {
        #[cfg(unix)]
        {
            self.termios.is_some()
        }

        #[cfg(not(unix))]
        false
    }

    /// Put the captured settings back and show the cursor
    pub fn restore(&self) {
        #[cfg(unix)]
        if let Some(termios) = &self.termios {
            // SAFETY: the struct came from tcgetattr on the same descriptor
            let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, termios) };
            if rc != 0 {
                tracing::debug!("failed to restore terminal settings");
            }
        }

        let term = Term::stderr();
        if term.is_term() {
            term.show_cursor().ok();
        }
    }
}

/// Exit code for a finished run: cancellation is a normal exit
pub fn exit_code(outcome: &crate::Result<()>) -> i32 {
    match outcome {
        Ok(()) | Err(crate::Error::Cancelled) => 0,
        Err(_) => 1,
    }
}
