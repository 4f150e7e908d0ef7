use std::io::{self, BufRead, Write};

use dropgate_core::{Outcome, Route};

/// Prefix for blocking notifications
const ALERT_PREFIX: &str = "[!]";

/// Lifecycle of one login or upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    Success,
    /// Server said no, or the attempt was refused before sending
    Rejected,
    /// Transport failure
    Unreachable,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Success | FlowState::Rejected | FlowState::Unreachable)
    }
}

/// The two inline regions, the pending blocking alerts and where to go next.
#[derive(Debug)]
pub struct StatusPanel {
    pub state: FlowState,
    pub success_region: Option<String>,
    pub error_region: Option<String>,
    pub alerts: Vec<String>,
    pub navigation: Option<Route>,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            success_region: None,
            error_region: None,
            alerts: Vec::new(),
            navigation: None,
        }
    }

    /// Start a new attempt. Regions from the previous attempt stay visible
    /// until this point.
    pub fn begin(&mut self) {
        self.success_region = None;
        self.error_region = None;
        self.navigation = None;
        self.state = FlowState::Submitting;
    }

    /// Record the result of the current attempt.
    pub fn apply(&mut self, outcome: &Outcome) -> FlowState {
        self.state = match outcome {
            Outcome::Success { message } => {
                self.error_region = None;
                self.success_region = Some(message.clone());
                FlowState::Success
            }
            Outcome::AuthError { reason: message } | Outcome::ValidationError { message } => {
                self.success_region = None;
                self.error_region = Some(message.clone());
                FlowState::Rejected
            }
            Outcome::NetworkError { cause } => {
                self.success_region = None;
                self.error_region = None;
                self.alerts
                    .push(format!("Could not reach the server. Check your connection. ({})", cause));
                FlowState::Unreachable
            }
            Outcome::Redirect(route) => {
                self.navigation = Some(*route);
                match route {
                    Route::Upload => FlowState::Success,
                    // Precondition failed, nothing was submitted
                    Route::Login => FlowState::Idle,
                }
            }
        };
        self.state
    }

    /// Print inline regions: success to `out`, error to `err`.
    pub fn render(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        if let Some(ref message) = self.success_region {
            writeln!(out, "{}", message)?;
        }
        if let Some(ref message) = self.error_region {
            writeln!(err, "Error: {}", message)?;
        }
        Ok(())
    }

    /// Show pending alerts. When `input` is interactive each one waits for Enter.
    pub fn acknowledge_alerts(
        &mut self,
        err: &mut impl Write,
        input: Option<&mut dyn BufRead>,
    ) -> io::Result<()> {
        let mut input = input;
        for alert in self.alerts.drain(..) {
            writeln!(err, "{} {}", ALERT_PREFIX, alert)?;
            if let Some(reader) = input.as_deref_mut() {
                write!(err, "Press Enter to continue...")?;
                err.flush()?;
                let mut line = String::new();
                reader.read_line(&mut line)?;
            }
        }
        Ok(())
    }

    /// Render everything to the real terminal. Alerts wait for Enter only
    /// when `interactive`.
    pub fn show(&mut self, interactive: bool) -> io::Result<()> {
        self.render(&mut io::stdout(), &mut io::stderr())?;
        if interactive {
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            self.acknowledge_alerts(&mut io::stderr(), Some(&mut lock))
        } else {
            self.acknowledge_alerts(&mut io::stderr(), None)
        }
    }
}
