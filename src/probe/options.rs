use std::time::Duration;

/// Controls how [`run_probe`](crate::probe::run_probe) reaches the exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub connect_timeout: Option<Duration>,
    pub command_timeout: Option<Duration>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            connect_timeout: Some(Duration::from_secs(10)),
            command_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl ProbeOptions {
    /// Applies the same deadline to connect, read and write. A zero timeout
    /// disables the deadlines and leaves the OS defaults in place.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        let timeout = (timeout_ms != 0).then(|| Duration::from_millis(timeout_ms));
        self.connect_timeout = timeout;
        self.command_timeout = timeout;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_disables_deadlines() {
        let options = ProbeOptions::default().with_timeout_ms(0);
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.command_timeout, None);
        assert_eq!(options.port, 25);
    }

    #[test]
    fn timeout_applies_to_every_step() {
        let options = ProbeOptions::default().with_timeout_ms(1_500).with_port(2525);
        assert_eq!(options.connect_timeout, Some(Duration::from_millis(1_500)));
        assert_eq!(options.command_timeout, Some(Duration::from_millis(1_500)));
        assert_eq!(options.port, 2525);
    }
}
