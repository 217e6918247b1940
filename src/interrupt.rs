// src/interrupt.rs

//! Keyboard interrupt handling
//!
//! An interrupt ends the whole run immediately: one message on stderr, exit
//! status 130, no cleanup of partially collected directories. Children share
//! the foreground process group and receive the same SIGINT.

use crate::error::{Error, Result};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

/// Printed when the run is interrupted
pub const INTERRUPT_MESSAGE: &str = "Force exit, Keyboard interrupt!\n";

/// Exit status used after an interrupt (128 + SIGINT)
pub const INTERRUPT_EXIT_CODE: i32 = 130;

extern "C" fn on_interrupt(_signal: libc::c_int) {
    // Only async-signal-safe calls here
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            INTERRUPT_MESSAGE.as_ptr().cast(),
            INTERRUPT_MESSAGE.len(),
        );
        libc::_exit(INTERRUPT_EXIT_CODE);
    }
}

/// Install the SIGINT handler for the rest of the process lifetime
pub fn install_handler() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    // SAFETY: the handler only calls write(2) and _exit(2)
    unsafe { sigaction(Signal::SIGINT, &action) }
        .map_err(|e| Error::Config(format!("Failed to install SIGINT handler: {}", e)))?;
    Ok(())
}
