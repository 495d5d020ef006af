use std::io::Write;

use serde::Serialize;

use crate::error::{HookError, Result};
use crate::response::Response;

/// Exit code for a handled event, or for a Stop failure under default policy.
pub const EXIT_SUCCESS: i32 = 0;

/// Default exit code for failures on every kind except Stop.
pub const EXIT_BLOCKING_ERROR: i32 = 2;

/// How the hook process ends: an exit code plus what to print.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitDirective {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExitDirective {
    /// Custom directive: `output` goes to stdout, stderr stays empty.
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code,
            stdout: output.into(),
            stderr: String::new(),
        }
    }

    /// Exit 0 with no output.
    pub fn success() -> Self {
        Self::default()
    }

    pub fn with_stderr(mut self, text: impl Into<String>) -> Self {
        self.stderr = text.into();
        self
    }

    /// Render a handler response.
    ///
    /// An empty response prints nothing; anything else is printed as
    /// indented JSON followed by a newline. Either way the code is 0.
    pub fn from_response(response: &Response) -> Result<Self> {
        if response.is_empty() {
            return Ok(Self::success());
        }
        Ok(Self::new(EXIT_SUCCESS, encode_pretty(response)?))
    }

    /// Write the output streams and terminate the process.
    pub fn exit(self) -> ! {
        if !self.stdout.is_empty() {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(self.stdout.as_bytes());
            let _ = out.flush();
        }
        if !self.stderr.is_empty() {
            let mut err = std::io::stderr().lock();
            let _ = err.write_all(self.stderr.as_bytes());
            let _ = err.flush();
        }
        std::process::exit(self.code)
    }
}

fn encode_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut body = serde_json::to_string_pretty(value).map_err(HookError::Encode)?;
    body.push('\n');
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{allow, approve, block_stop};

    #[test]
    fn empty_response_prints_nothing() {
        let d = ExitDirective::from_response(&allow().into()).unwrap();
        assert_eq!(d, ExitDirective::success());
    }

    #[test]
    fn non_empty_response_is_indented_json() {
        let d = ExitDirective::from_response(&approve().into()).unwrap();
        assert_eq!(d.code, 0);
        assert_eq!(d.stdout, "{\n  \"decision\": \"approve\"\n}\n");
        assert!(d.stderr.is_empty());
    }

    #[test]
    fn stop_block_carries_decision_and_reason() {
        let d = ExitDirective::from_response(&block_stop("confirm").into()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&d.stdout).unwrap();
        assert_eq!(v["decision"], "block");
        assert_eq!(v["reason"], "confirm");
    }
}
