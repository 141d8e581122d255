use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mail_bouncer::{ProbeOptions, parse_address};

#[derive(Debug, Parser)]
#[command(name = "mail-bouncer", version, about = "Email deliverability checks over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// address to listen on; `:port` listens on every interface
    #[arg(long, default_value = ":8080", global = true)]
    pub listen: String,

    /// hostname announced with EHLO/HELO
    #[arg(long, default_value = "localhost", global = true)]
    pub host: String,

    /// envelope sender used for MAIL FROM
    #[arg(long, default_value = "tester@localhost", global = true)]
    pub from: String,

    /// connect/read/write timeout for SMTP probes, 0 disables it
    #[arg(long, default_value_t = 10_000, global = true)]
    pub timeout_ms: u64,

    /// SMTP port of the exchangers
    #[arg(long, default_value_t = 25, global = true)]
    pub smtp_port: u16,

    /// emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// validate one address and exit (0 valid, 2 invalid)
    Check {
        email: String,
        /// format: human|json
        #[arg(long, default_value = "human")]
        format: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn output_format(raw: &str) -> Result<OutputFormat> {
    match raw {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        other => bail!("unknown --format '{other}' (expected human or json)"),
    }
}

impl Cli {
    /// `:8080` becomes `0.0.0.0:8080`.
    pub fn listen_addr(&self) -> Result<String> {
        let raw = self.listen.trim();
        if raw.is_empty() {
            bail!("--listen must not be empty");
        }
        Ok(match raw.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => raw.to_string(),
        })
    }

    /// The `--from` address reduced to its addr-spec.
    pub fn sender(&self) -> Result<String> {
        let address = parse_address(&self.from)
            .with_context(|| format!("invalid --from address '{}'", self.from))?;
        Ok(address.addr_spec())
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions::default()
            .with_timeout_ms(self.timeout_ms)
            .with_port(self.smtp_port)
    }
}
