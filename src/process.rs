use crate::channel::{Channel, ReadEnd, WriteEnd};
use crate::combine::{combine, Combined};
use crate::error::{PipeminError, Result};
use crate::input::InputSequence;
use crate::lifecycle::{ChildPhase, Lifecycle, ParentPhase};
use crate::reduce::{Half, PartialMin};
use log::{debug, error, info};
use nix::errno::Errno;
use nix::sys::wait::WaitStatus;
use nix::unistd::{fork, getpid, ForkResult, Pid};
use std::io::{self, Read, Write};

/// Which side of the fork a code path runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Parent,
    Child,
}

impl Role {
    pub fn tag(self) -> &'static str {
        match self {
            Role::Parent => "[Parent]",
            Role::Child => "[Child]",
        }
    }

    /// The half of the input this side reduces
    pub fn half(self) -> Half {
        match self {
            Role::Parent => Half::First,
            Role::Child => Half::Second,
        }
    }

    /// Stdout line announcing a partial result
    pub fn report(self, pid: Pid, partial: &PartialMin) -> String {
        format!(
            "{} PID={} | Min({}) = {}",
            self.tag(),
            pid,
            partial.half.describe(),
            partial.value
        )
    }
}

/// What each process holds right after the fork
pub enum Split {
    Parent { child: ChildProcess, read: ReadEnd },
    Child { write: WriteEnd },
}

/// Fork once and narrow the channel to one direction on each side
pub fn split(channel: Channel) -> Result<Split> {
    // Buffered output would otherwise be emitted by both processes
    let _ = io::stdout().flush();

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("[Parent] Forked child process with PID: {}", child);
            Ok(Split::Parent {
                child: ChildProcess { pid: child },
                read: channel.into_read_end(),
            })
        }
        Ok(ForkResult::Child) => Ok(Split::Child {
            write: channel.into_write_end(),
        }),
        Err(e) => Err(PipeminError::ProcessCreation(e)),
    }
}

/// Handle on the forked child, consumed by the single wait
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
}

impl ChildProcess {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the child terminates
    ///
    /// One wait, no timeout and no retry, interrupted or not.
    pub fn wait(self) -> Result<ExitReport> {
        let mut raw: libc::c_int = 0;
        let rc = unsafe { libc::waitpid(self.pid.as_raw(), &mut raw, 0) };
        if rc == -1 {
            return Err(PipeminError::Wait(Errno::last()));
        }

        let status = WaitStatus::from_raw(self.pid, raw).map_err(PipeminError::Wait)?;
        Ok(ExitReport {
            pid: self.pid,
            raw,
            status,
        })
    }
}

/// Termination of the child as reported by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    pub pid: Pid,
    /// Undecoded status word from `waitpid`
    pub raw: i32,
    pub status: WaitStatus,
}

impl ExitReport {
    /// Exit code if the child exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            WaitStatus::Exited(_, code) => Some(code),
            _ => None,
        }
    }
}

/// What the child did before exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildReport {
    pub partial: PartialMin,
    pub sent: bool,
}

/// What the parent ended up with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentReport {
    pub partial: PartialMin,
    pub combined: Combined,
    /// `None` when the wait itself failed
    pub exit: Option<ExitReport>,
}

/// Result of [`run_pair`] in whichever process returns from it
#[derive(Debug)]
pub enum Outcome {
    Parent(ParentReport),
    Child(ChildReport),
}

/// Child side: reduce the second half, send it, close the write end
///
/// Never fails; a broken channel is logged and left for the parent's
/// fallback.
pub fn run_child<W: Write>(input: &InputSequence, mut write: WriteEnd<W>) -> ChildReport {
    let mut lifecycle = Lifecycle::new(ChildPhase::Split);

    lifecycle.advance();
    let partial = PartialMin::compute(input, Role::Child.half());
    println!("{}", Role::Child.report(getpid(), &partial));

    lifecycle.advance();
    let sent = match write.send_partial(partial.value) {
        Ok(()) => true,
        Err(e) => {
            error!("[Child] {}", e);
            false
        }
    };
    write.close();

    lifecycle.advance();
    ChildReport { partial, sent }
}

/// Parent side of the transfer: read the child's value, then close
pub fn receive_and_combine<R: Read>(parent: i32, mut read: ReadEnd<R>) -> Combined {
    let received = read.receive_partial();
    read.close();
    combine(parent, received)
}

/// Parent side: reduce the first half, combine with the child's, reap it
pub fn run_parent<R: Read>(
    input: &InputSequence,
    child: ChildProcess,
    read: ReadEnd<R>,
    mut lifecycle: Lifecycle<ParentPhase>,
) -> ParentReport {
    lifecycle.advance();
    let partial = PartialMin::compute(input, Role::Parent.half());
    println!("{}", Role::Parent.report(getpid(), &partial));

    lifecycle.advance();
    let combined = receive_and_combine(partial.value, read);

    lifecycle.advance();
    println!("{} Combined: {}", Role::Parent.tag(), combined);

    lifecycle.advance();
    let pid = child.pid();
    let exit = match child.wait() {
        Ok(report) => {
            println!(
                "{} Child PID {} exited with status {}",
                Role::Parent.tag(),
                report.pid,
                report.raw
            );
            info!("[Parent] Child status decoded as {:?}", report.status);
            Some(report)
        }
        Err(e) => {
            error!("[Parent] {} (child PID {})", e, pid);
            None
        }
    };

    lifecycle.advance();
    ParentReport {
        partial,
        combined,
        exit,
    }
}

/// Create the channel, fork, and run whichever side this process is
///
/// Returns in both processes. Only channel or process creation failures
/// surface as errors.
pub fn run_pair(input: &InputSequence) -> Result<Outcome> {
    let mut lifecycle = Lifecycle::new(ParentPhase::Init);

    let channel = match Channel::open() {
        Ok(channel) => channel,
        Err(e) => {
            lifecycle.fail();
            return Err(e);
        }
    };
    lifecycle.advance();

    let split = match split(channel) {
        Ok(split) => split,
        Err(e) => {
            lifecycle.fail();
            return Err(e);
        }
    };

    match split {
        Split::Child { write } => Ok(Outcome::Child(run_child(input, write))),
        Split::Parent { child, read } => {
            lifecycle.advance();
            Ok(Outcome::Parent(run_parent(input, child, read, lifecycle)))
        }
    }
}
