//! One-way pipe between the two processes
//!
//! The child's partial result travels as a raw native-endian `i32`:
//! exactly [`PARTIAL_WIDTH`] bytes, no length prefix, no type tag. Both
//! sides run the same binary on the same machine, so width and byte
//! order always agree. Changing either breaks the wire contract.

use crate::error::{PipeminError, ReadFailure, Result, WriteFailure};
use log::debug;
use nix::unistd::pipe;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, OwnedFd};

/// Bytes on the wire for one partial result
pub const PARTIAL_WIDTH: usize = std::mem::size_of::<i32>();

pub fn encode_partial(value: i32) -> [u8; PARTIAL_WIDTH] {
    value.to_ne_bytes()
}

pub fn decode_partial(bytes: [u8; PARTIAL_WIDTH]) -> i32 {
    i32::from_ne_bytes(bytes)
}

/// Both endpoints of a freshly created pipe
///
/// Created before the fork so each process inherits both descriptors.
/// Each side then keeps one end and drops the other; a reader that keeps
/// its own write end open would never see end-of-stream.
pub struct Channel {
    read: OwnedFd,
    write: OwnedFd,
}

impl Channel {
    /// Create the pipe
    pub fn open() -> Result<Self> {
        let (read, write) = pipe().map_err(PipeminError::ChannelCreation)?;
        debug!(
            "Created channel: read fd {}, write fd {}",
            read.as_raw_fd(),
            write.as_raw_fd()
        );
        Ok(Self { read, write })
    }

    /// Take both ends, for callers that keep them in one process
    pub fn into_ends(self) -> (ReadEnd, WriteEnd) {
        (
            ReadEnd::new(File::from(self.read)),
            WriteEnd::new(File::from(self.write)),
        )
    }

    /// Keep the read end and close the write end
    pub fn into_read_end(self) -> ReadEnd {
        let (read, write) = self.into_ends();
        drop(write);
        read
    }

    /// Keep the write end and close the read end
    pub fn into_write_end(self) -> WriteEnd {
        let (read, write) = self.into_ends();
        drop(read);
        write
    }
}

/// Receiving side of the channel
pub struct ReadEnd<R = File> {
    inner: R,
}

impl<R: Read> ReadEnd<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Block until one full partial result arrives or the writer goes away
    ///
    /// End-of-stream before [`PARTIAL_WIDTH`] bytes is a failure: zero bytes
    /// means the writer closed without sending, fewer means a torn value.
    pub fn receive_partial(&mut self) -> Result<i32> {
        let mut buf = [0u8; PARTIAL_WIDTH];
        let mut filled = 0;

        while filled < PARTIAL_WIDTH {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PipeminError::ChannelRead(ReadFailure::Io(e))),
            }
        }

        match filled {
            0 => Err(PipeminError::ChannelRead(ReadFailure::Closed)),
            n if n < PARTIAL_WIDTH => Err(PipeminError::ChannelRead(ReadFailure::Short {
                expected: PARTIAL_WIDTH,
                got: n,
            })),
            _ => Ok(decode_partial(buf)),
        }
    }

    /// Close the endpoint
    pub fn close(self) {
        drop(self);
    }
}

/// Sending side of the channel
pub struct WriteEnd<W = File> {
    inner: W,
}

impl<W: Write> WriteEnd<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Send one partial result in a single write
    ///
    /// A short write is reported, not completed: the value is small enough
    /// for the kernel to move atomically, so a partial transfer means the
    /// channel is broken.
    pub fn send_partial(&mut self, value: i32) -> Result<()> {
        let bytes = encode_partial(value);
        loop {
            match self.inner.write(&bytes) {
                Ok(n) if n == PARTIAL_WIDTH => return Ok(()),
                Ok(n) => {
                    return Err(PipeminError::ChannelWrite(WriteFailure::Short {
                        expected: PARTIAL_WIDTH,
                        written: n,
                    }))
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PipeminError::ChannelWrite(WriteFailure::Io(e))),
            }
        }
    }

    /// Close the endpoint
    pub fn close(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Truncating(usize);

    impl Write for Truncating {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len().min(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn wire_format_is_native_i32() {
        assert_eq!(PARTIAL_WIDTH, 4);
        assert_eq!(encode_partial(3), 3i32.to_ne_bytes());
        assert_eq!(decode_partial(encode_partial(-42)), -42);
    }

    #[test]
    fn pipe_carries_one_partial() {
        let (mut read, mut write) = Channel::open().unwrap().into_ends();
        write.send_partial(731).unwrap();
        write.close();
        assert_eq!(read.receive_partial().unwrap(), 731);
    }

    #[test]
    fn closed_writer_yields_closed_failure() {
        let (mut read, write) = Channel::open().unwrap().into_ends();
        write.close();
        match read.receive_partial() {
            Err(PipeminError::ChannelRead(ReadFailure::Closed)) => {}
            other => panic!("expected closed channel, got {:?}", other),
        }
    }

    #[test]
    fn torn_value_yields_short_failure() {
        let bytes = encode_partial(12);
        let mut read = ReadEnd::new(&bytes[..2]);
        match read.receive_partial() {
            Err(PipeminError::ChannelRead(ReadFailure::Short { expected, got })) => {
                assert_eq!(expected, PARTIAL_WIDTH);
                assert_eq!(got, 2);
            }
            other => panic!("expected short read, got {:?}", other),
        }
    }

    #[test]
    fn extra_bytes_are_left_unread() {
        let mut stream = encode_partial(9).to_vec();
        stream.extend_from_slice(&encode_partial(1));
        let mut read = ReadEnd::new(&stream[..]);
        assert_eq!(read.receive_partial().unwrap(), 9);
    }

    #[test]
    fn short_write_is_reported() {
        let mut write = WriteEnd::new(Truncating(1));
        match write.send_partial(5) {
            Err(PipeminError::ChannelWrite(WriteFailure::Short { expected, written })) => {
                assert_eq!(expected, PARTIAL_WIDTH);
                assert_eq!(written, 1);
            }
            other => panic!("expected short write, got {:?}", other),
        }
    }

    #[test]
    fn write_without_reader_is_broken_pipe() {
        // The Rust runtime ignores SIGPIPE, so the write fails with EPIPE.
        let (read, mut write) = Channel::open().unwrap().into_ends();
        read.close();
        match write.send_partial(5) {
            Err(PipeminError::ChannelWrite(WriteFailure::Io(e))) => {
                assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("expected broken pipe, got {:?}", other),
        }
    }
}
