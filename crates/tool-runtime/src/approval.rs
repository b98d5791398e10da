//! Synchronous human-in-the-loop approval.
//!
//! The prompt blocks the calling thread until the operator answers one line.
//! Only the exact token [`AFFIRMATIVE`] approves; everything else, including
//! end of input, denies.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use crate::invocation::InvocationRequest;

/// The only response that approves an operation.
pub const AFFIRMATIVE: &str = "Y";

/// Shown to the operator before reading the answer.
pub const APPROVAL_MESSAGE: &str =
    "System Message: The assistant requires approval to complete this operation. Do you approve (Y/N)";

/// Answer handed back to the model when approval is not granted.
pub const DENIAL_REASON: &str = "The operation was not approved by the user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Denied,
}

impl ApprovalDecision {
    /// Interpret one raw input line. The line terminator is stripped;
    /// nothing else is normalized.
    pub fn from_response(line: &str) -> Self {
        let answer = line.strip_suffix('\n').unwrap_or(line);
        let answer = answer.strip_suffix('\r').unwrap_or(answer);
        if answer == AFFIRMATIVE {
            Self::Approved
        } else {
            Self::Denied
        }
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// Asks a human whether a pending invocation may proceed.
pub trait ApprovalPrompt: Send + Sync {
    fn ask(&self, request: &InvocationRequest) -> io::Result<ApprovalDecision>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LineApprovalPrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> LineApprovalPrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Give back the reader and writer, e.g. to inspect what was written.
    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<R, W> ApprovalPrompt for LineApprovalPrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, _request: &InvocationRequest) -> io::Result<ApprovalDecision> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| io::Error::other("approval prompt lock poisoned"))?;
        let (reader, writer) = &mut *guard;

        writeln!(writer, "{}", APPROVAL_MESSAGE)?;
        write!(writer, "User: ")?;
        writer.flush()?;

        let mut line = String::new();
        reader.read_line(&mut line)?;
        Ok(ApprovalDecision::from_response(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::{Arguments, OperationId};
    use std::io::Cursor;

    fn request() -> InvocationRequest {
        InvocationRequest::new(
            "call_1",
            OperationId::new("DevopsPlugin", "DeployToProd"),
            Arguments::default(),
        )
    }

    #[test]
    fn test_exact_affirmative_only() {
        assert_eq!(ApprovalDecision::from_response("Y\n"), ApprovalDecision::Approved);
        assert_eq!(ApprovalDecision::from_response("Y\r\n"), ApprovalDecision::Approved);
        assert_eq!(ApprovalDecision::from_response("Y"), ApprovalDecision::Approved);

        for answer in ["y\n", "yes\n", "Yes\n", " Y\n", "Y \n", "N\n", "n\n", "\n", ""] {
            assert_eq!(
                ApprovalDecision::from_response(answer),
                ApprovalDecision::Denied,
                "answer {:?} must deny",
                answer
            );
        }
    }

    #[test]
    fn test_line_prompt_writes_message_and_reads_one_line() {
        let prompt = LineApprovalPrompt::new(Cursor::new(b"Y\nN\n".to_vec()), Vec::new());

        assert!(prompt.ask(&request()).unwrap().is_approved());
        assert!(!prompt.ask(&request()).unwrap().is_approved());

        let (_, written) = prompt.into_inner();
        let written = String::from_utf8(written).unwrap();
        assert_eq!(written.matches(APPROVAL_MESSAGE).count(), 2);
        assert!(written.ends_with("User: "));
    }

    #[test]
    fn test_end_of_input_denies() {
        let prompt = LineApprovalPrompt::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(prompt.ask(&request()).unwrap(), ApprovalDecision::Denied);
    }
}
