// Platform-specific compilation guard
#[cfg(not(unix))]
compile_error!("pipemin requires a Unix-like operating system. \
                It is built on fork(2), pipe(2) and waitpid(2).");

#[cfg(unix)]
pub mod channel;
#[cfg(unix)]
pub mod cli;
#[cfg(unix)]
pub mod combine;
#[cfg(unix)]
pub mod error;
#[cfg(unix)]
pub mod input;
#[cfg(unix)]
pub mod lifecycle;
#[cfg(unix)]
pub mod logging;
#[cfg(unix)]
pub mod process;
#[cfg(unix)]
pub mod reduce;
