//! Output boundary.
//!
//! The dispatcher hands the final response to an [`Output`] as status, then
//! each header, then the body. What happens to the bytes is up to the host.

use std::io::{self, Write};

use axum::http::{HeaderName, HeaderValue, StatusCode};

/// Receiver of a finished response.
pub trait Output {
    fn status(&mut self, status: StatusCode) -> io::Result<()>;
    fn header(&mut self, name: &HeaderName, value: &HeaderValue) -> io::Result<()>;
    fn body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// Writes an HTTP/1.1-style message to any `Write`.
#[derive(Debug)]
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for WriterOutput<W> {
    fn status(&mut self, status: StatusCode) -> io::Result<()> {
        write!(self.writer, "HTTP/1.1 {}\r\n", status)
    }

    fn header(&mut self, name: &HeaderName, value: &HeaderValue) -> io::Result<()> {
        self.writer.write_all(name.as_str().as_bytes())?;
        self.writer.write_all(b": ")?;
        self.writer.write_all(value.as_bytes())?;
        self.writer.write_all(b"\r\n")
    }

    fn body(&mut self, body: &[u8]) -> io::Result<()> {
        self.writer.write_all(b"\r\n")?;
        self.writer.write_all(body)?;
        self.writer.flush()
    }
}
