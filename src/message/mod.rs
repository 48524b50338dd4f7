//! Encoding and decoding of the messages exchanged with the database server.
//!
//! <https://www.postgresql.org/docs/current/protocol-message-formats.html>

// REQUESTS
mod close;
mod describe;
mod flush;
mod parse;
mod password;
mod query;
mod startup;
mod sync;
mod terminate;

pub(crate) use close::Close;
pub(crate) use describe::Describe;
pub(crate) use flush::Flush;
pub(crate) use parse::Parse;
pub(crate) use password::Password;
pub(crate) use query::Query;
pub(crate) use startup::Startup;
pub(crate) use sync::Sync;
pub(crate) use terminate::Terminate;

// RESPONSES
mod authentication;
mod backend_key_data;
mod command_complete;
mod data_row;
mod parameter_description;
mod parameter_status;
mod ready_for_query;
mod response;
mod row_description;

pub(crate) use authentication::Authentication;
pub(crate) use backend_key_data::BackendKeyData;
pub(crate) use command_complete::CommandComplete;
pub(crate) use data_row::DataRow;
pub(crate) use parameter_description::ParameterDescription;
pub(crate) use parameter_status::ParameterStatus;
pub(crate) use ready_for_query::{ReadyForQuery, TransactionStatus};
pub(crate) use response::Response;
pub use row_description::{Field, RowDescription};

use bytes::Bytes;

use crate::error::Result;
use crate::io::Decode;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MessageFormat {
    Authentication,
    BackendKeyData,
    CloseComplete,
    CommandComplete,
    DataRow,
    EmptyQueryResponse,
    ErrorResponse,
    NoData,
    NoticeResponse,
    NotificationResponse,
    ParameterDescription,
    ParameterStatus,
    ParseComplete,
    PortalSuspended,
    ReadyForQuery,
    RowDescription,
}

#[derive(Debug)]
pub struct Message {
    pub format: MessageFormat,
    pub(crate) contents: Bytes,
}

impl Message {
    #[inline]
    pub(crate) fn decode<T>(self) -> Result<T>
    where
        T: Decode,
    {
        T::decode(self.contents)
    }
}

impl MessageFormat {
    pub(crate) fn try_from_u8(v: u8) -> Result<Self> {
        Ok(match v {
            b'1' => MessageFormat::ParseComplete,
            b'3' => MessageFormat::CloseComplete,
            b'A' => MessageFormat::NotificationResponse,
            b'C' => MessageFormat::CommandComplete,
            b'D' => MessageFormat::DataRow,
            b'E' => MessageFormat::ErrorResponse,
            b'I' => MessageFormat::EmptyQueryResponse,
            b'K' => MessageFormat::BackendKeyData,
            b'N' => MessageFormat::NoticeResponse,
            b'R' => MessageFormat::Authentication,
            b'S' => MessageFormat::ParameterStatus,
            b'T' => MessageFormat::RowDescription,
            b'Z' => MessageFormat::ReadyForQuery,
            b'n' => MessageFormat::NoData,
            b's' => MessageFormat::PortalSuspended,
            b't' => MessageFormat::ParameterDescription,

            _ => {
                return Err(err_protocol!("unknown message type: {:?}", v as char));
            }
        })
    }
}
