use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::SmtpReply;

/// RFC 5321 reply line limit, CRLF included.
pub(crate) const MAX_REPLY_LINE: usize = 512;

/// One plaintext SMTP connection. Dropped without ceremony once the probe ends.
pub(crate) struct SmtpSession {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
}

impl SmtpSession {
    /// Tries each address in turn and keeps the first that accepts.
    pub(crate) fn connect(
        addrs: &[SocketAddr],
        connect_timeout: Option<Duration>,
        command_timeout: Option<Duration>,
    ) -> io::Result<(Self, SocketAddr)> {
        let mut last_err = io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "exchanger resolved to no socket address",
        );
        for &addr in addrs {
            let stream = match connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match stream {
                Ok(stream) => return Self::from_stream(stream, command_timeout).map(|s| (s, addr)),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    fn from_stream(stream: TcpStream, command_timeout: Option<Duration>) -> io::Result<Self> {
        stream.set_read_timeout(command_timeout)?;
        stream.set_write_timeout(command_timeout)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
        })
    }

    pub(crate) fn send_command(&mut self, command: &str) -> io::Result<()> {
        write!(self.writer, "{command}\r\n")?;
        self.writer.flush()
    }

    /// Reads a full reply, following `NNN-` continuation lines.
    pub(crate) fn read_reply(&mut self) -> io::Result<SmtpReply> {
        let mut reply: Option<SmtpReply> = None;
        loop {
            let raw = self.read_reply_line()?;
            let line = parse_reply_line(raw.trim_end_matches(['\r', '\n']))?;

            match reply.as_mut() {
                None => reply = Some(SmtpReply::new(line.code, line.text)),
                Some(current) if current.code == line.code => {
                    current.message.push('\n');
                    current.message.push_str(line.text);
                }
                Some(current) => {
                    return Err(invalid_data(format!(
                        "inconsistent SMTP reply codes: {} vs {}",
                        current.code, line.code
                    )));
                }
            }

            if line.last {
                return reply.ok_or_else(|| invalid_data("empty SMTP reply".to_string()));
            }
        }
    }

    /// One reply line, at most [`MAX_REPLY_LINE`] octets. Bytes that are not
    /// UTF-8 are replaced rather than rejected.
    fn read_reply_line(&mut self) -> io::Result<String> {
        let mut raw = Vec::new();
        let read = (&mut self.reader)
            .take(MAX_REPLY_LINE as u64)
            .read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        if raw.last() != Some(&b'\n') && read == MAX_REPLY_LINE {
            return Err(invalid_data(format!(
                "SMTP reply line exceeds {MAX_REPLY_LINE} octets"
            )));
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

struct ReplyLine<'a> {
    code: u16,
    last: bool,
    text: &'a str,
}

/// `NNN text` ends a reply, `NNN-text` continues it.
fn parse_reply_line(line: &str) -> io::Result<ReplyLine<'_>> {
    let digits = line
        .get(..3)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| invalid_data(format!("invalid SMTP reply: '{line}'")))?;
    let code = digits
        .parse()
        .map_err(|_| invalid_data(format!("invalid SMTP status code: '{digits}'")))?;
    let rest = &line[3..];
    let last = !rest.starts_with('-');
    let text = rest.get(1..).unwrap_or_default();
    Ok(ReplyLine { code, last, text })
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

pub(crate) fn resolve_socket_addrs(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    (host, port).to_socket_addrs().map(Iterator::collect)
}
