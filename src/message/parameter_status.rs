use bytes::Bytes;

use crate::error::Result;
use crate::io::{BufExt, Decode};

/// Reports a run-time parameter the server considers interesting, e.g.
/// `server_version` or `client_encoding`. Sent during startup and whenever a
/// value changes.
#[derive(Debug)]
pub(crate) struct ParameterStatus {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl Decode for ParameterStatus {
    fn decode(mut buf: Bytes) -> Result<Self> {
        Ok(Self {
            name: buf.get_str_nul()?,
            value: buf.get_str_nul()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterStatus;
    use crate::io::Decode;
    use bytes::Bytes;

    #[test]
    fn it_decodes_parameter_status() {
        let m =
            ParameterStatus::decode(Bytes::from_static(b"client_encoding\0UTF8\0")).unwrap();

        assert_eq!(m.name, "client_encoding");
        assert_eq!(m.value, "UTF8");
    }
}
