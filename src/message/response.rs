use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::{BufExt, Decode};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum PgSeverity {
    Panic,
    Fatal,
    Error,
    Warning,
    Notice,
    Debug,
    Info,
    Log,
}

impl PgSeverity {
    #[inline]
    pub(crate) fn is_error(self) -> bool {
        matches!(self, Self::Panic | Self::Fatal | Self::Error)
    }
}

/// The body of an ErrorResponse or NoticeResponse.
///
/// Fields are tagged with a single-letter code on the wire; descriptions are
/// available at <https://www.postgresql.org/docs/current/protocol-error-fields.html>.
#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) severity: PgSeverity,
    pub(crate) code: String,
    pub(crate) message: String,
    pub(crate) hint: Option<String>,
    pub(crate) position: Option<usize>,
}

impl Decode for Response {
    fn decode(mut buf: Bytes) -> Result<Self> {
        let mut severity = None;
        let mut severity_non_local = None;
        let mut code = None;
        let mut message = None;
        let mut hint = None;
        let mut position = None;

        loop {
            let field = buf.get_u8();

            if field == 0 {
                break;
            }

            let value = buf.get_str_nul()?;

            match field {
                b'S' => {
                    // May be localized; only used if `V` is absent (pre-9.6).
                    severity = parse_severity(&value);
                }

                b'V' => {
                    severity_non_local = parse_severity(&value);
                }

                b'C' => {
                    code = Some(value);
                }

                b'M' => {
                    message = Some(value);
                }

                b'H' => {
                    hint = Some(value);
                }

                b'P' => {
                    position = value.parse().ok();
                }

                _ => {
                    // detail, schema, table, constraint, file, line, ... are
                    // not consumed by the resolver
                }
            }
        }

        Ok(Self {
            severity: severity_non_local
                .or(severity)
                .ok_or_else(|| err_protocol!("did not receive field `severity` in Response"))?,
            code: code.ok_or_else(|| err_protocol!("did not receive field `code` in Response"))?,
            message: message
                .ok_or_else(|| err_protocol!("did not receive field `message` in Response"))?,
            hint,
            position,
        })
    }
}

fn parse_severity(s: &str) -> Option<PgSeverity> {
    Some(match s {
        "PANIC" => PgSeverity::Panic,
        "FATAL" => PgSeverity::Fatal,
        "ERROR" => PgSeverity::Error,
        "WARNING" => PgSeverity::Warning,
        "NOTICE" => PgSeverity::Notice,
        "DEBUG" => PgSeverity::Debug,
        "INFO" => PgSeverity::Info,
        "LOG" => PgSeverity::Log,

        _ => return None,
    })
}
