use std::io;
use thiserror::Error;

/// Process exit codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    NoError = 0,
    SetupError = 1,
}

impl ReturnCode {
    pub fn as_exit_code(self) -> i32 {
        self as i32
    }
}

/// Why the parent did not receive a complete partial result
#[derive(Error, Debug)]
pub enum ReadFailure {
    #[error("channel closed before any byte was written")]
    Closed,

    #[error("expected {expected} bytes, got {got}")]
    Short { expected: usize, got: usize },

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Why the child could not hand its partial result over
#[derive(Error, Debug)]
pub enum WriteFailure {
    #[error("wrote {written} of {expected} bytes")]
    Short { expected: usize, written: usize },

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Main error type for pipemin operations
#[derive(Error, Debug)]
pub enum PipeminError {
    #[error("pipe() failed: {0}")]
    ChannelCreation(nix::Error),

    #[error("fork() failed: {0}")]
    ProcessCreation(nix::Error),

    #[error("write() failed: {0}")]
    ChannelWrite(WriteFailure),

    #[error("read() failed/short: {0}")]
    ChannelRead(ReadFailure),

    #[error("waitpid() failed: {0}")]
    Wait(nix::Error),
}

impl PipeminError {
    /// Setup failures end the run; transfer and wait failures are contained
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipeminError::ChannelCreation(_) | PipeminError::ProcessCreation(_)
        )
    }

    /// Convert error to the appropriate return code
    pub fn to_return_code(&self) -> ReturnCode {
        match self {
            PipeminError::ChannelCreation(_) => ReturnCode::SetupError,
            PipeminError::ProcessCreation(_) => ReturnCode::SetupError,
            PipeminError::ChannelWrite(_) => ReturnCode::NoError,
            PipeminError::ChannelRead(_) => ReturnCode::NoError,
            PipeminError::Wait(_) => ReturnCode::NoError,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.to_return_code().as_exit_code()
    }
}

/// Result type alias for pipemin operations
pub type Result<T> = std::result::Result<T, PipeminError>;
