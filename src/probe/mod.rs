//! SMTP deliverability probe.
//!
//! [`run_probe`] opens one plaintext connection to an exchanger and walks it
//! through greeting, `MAIL FROM` and `RCPT TO` before quitting. No message
//! content is ever sent and nothing is retried.

mod error;
mod options;
mod session;
mod types;

pub use error::{ProbeError, SessionError};
pub use options::ProbeOptions;
pub use types::{ProbeReport, ProbeStage, ProbeTarget, SmtpEvent, SmtpReply};

use crate::events::{EventSink, ValidationEvent};
use session::{SmtpSession, resolve_socket_addrs};

use ProbeStage as Stage;

const RCPT_ACCEPTED: &[u16] = &[250, 251];

/// Runs the five probe steps against `target.exchanger`.
///
/// Steps 1 to 4 short-circuit on the first failure. A failing `QUIT` is
/// returned inside the report instead, since the recipient verdict is already
/// known by then.
pub fn run_probe(
    target: &ProbeTarget<'_>,
    options: &ProbeOptions,
    sink: &dyn EventSink,
) -> Result<ProbeReport, ProbeError> {
    let transcript = Transcript {
        exchanger: target.exchanger,
        sink,
    };
    let connect_failed = |source: SessionError| ProbeError::Connect {
        host: target.exchanger.to_string(),
        source,
    };

    let (mut session, peer) = resolve_socket_addrs(target.exchanger, options.port)
        .and_then(|addrs| {
            SmtpSession::connect(&addrs, options.connect_timeout, options.command_timeout)
        })
        .map_err(|err| {
            transcript.failed(Stage::Connect, &err);
            connect_failed(err.into())
        })?;

    let banner = session.read_reply().map_err(|err| {
        transcript.failed(Stage::Connect, &err);
        connect_failed(err.into())
    })?;
    transcript.received(Stage::Connect, &banner);
    if !banner.is_positive_completion() {
        return Err(connect_failed(SessionError::Reply(banner)));
    }

    greet(&mut session, target.hostname, &transcript)
        .map_err(|source| ProbeError::Greeting { source })?;

    let mail_from = format!("MAIL FROM:<{}>", target.sender);
    exchange(&mut session, &mail_from, Stage::Sender, &[250], &transcript)
        .map_err(|source| ProbeError::Sender { source })?;

    let rcpt_to = format!("RCPT TO:<{}>", target.recipient);
    exchange(&mut session, &rcpt_to, Stage::Recipient, RCPT_ACCEPTED, &transcript).map_err(
        |source| ProbeError::Recipient {
            recipient: target.recipient.to_string(),
            source,
        },
    )?;

    let quit_error = exchange(&mut session, "QUIT", Stage::Quit, &[221], &transcript)
        .err()
        .map(|source| ProbeError::Quit { source });

    Ok(ProbeReport {
        exchanger: target.exchanger.to_string(),
        peer,
        quit_error,
    })
}

/// `EHLO`, falling back to `HELO` for servers that refuse the extended form.
fn greet(
    session: &mut SmtpSession,
    hostname: &str,
    transcript: &Transcript<'_>,
) -> Result<SmtpReply, SessionError> {
    let ehlo = format!("EHLO {hostname}");
    match exchange(session, &ehlo, Stage::Greeting, &[250], transcript) {
        Err(SessionError::Reply(reply)) if reply.is_permanent_failure() => {
            let helo = format!("HELO {hostname}");
            exchange(session, &helo, Stage::Greeting, &[250], transcript)
        }
        other => other,
    }
}

fn exchange(
    session: &mut SmtpSession,
    command: &str,
    stage: Stage,
    expected: &[u16],
    transcript: &Transcript<'_>,
) -> Result<SmtpReply, SessionError> {
    transcript.sent(stage, command);
    let reply = session
        .send_command(command)
        .and_then(|()| session.read_reply())
        .map_err(|err| {
            transcript.failed(stage, &err);
            err
        })?;
    transcript.received(stage, &reply);

    if expected.contains(&reply.code) {
        Ok(reply)
    } else {
        Err(SessionError::Reply(reply))
    }
}

struct Transcript<'a> {
    exchanger: &'a str,
    sink: &'a dyn EventSink,
}

impl Transcript<'_> {
    fn sent(&self, stage: Stage, command: &str) {
        self.emit(SmtpEvent::Sent {
            stage,
            command: command.to_string(),
        });
    }

    fn received(&self, stage: Stage, reply: &SmtpReply) {
        self.emit(SmtpEvent::Received {
            stage,
            reply: reply.clone(),
        });
    }

    fn failed(&self, stage: Stage, err: &std::io::Error) {
        self.emit(SmtpEvent::Error {
            stage,
            message: err.to_string(),
        });
    }

    fn emit(&self, event: SmtpEvent) {
        self.sink.emit(&ValidationEvent::Smtp {
            exchanger: self.exchanger.to_string(),
            event,
        });
    }
}
