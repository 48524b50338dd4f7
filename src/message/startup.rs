use crate::io::{BufMutExt, Encode};

// To begin a session, a frontend opens a connection to the server
// and sends a startup message.

#[derive(Debug)]
pub(crate) struct Startup<'a> {
    /// Parameter names and values, e.g. `user`, `database`, `client_encoding`.
    pub(crate) params: &'a [(&'a str, &'a str)],
}

impl Encode for Startup<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        // the startup message is the only frame without a format prefix
        buf.put_length_prefixed(|buf| {
            // protocol version: 3.0
            buf.extend_from_slice(&3_u16.to_be_bytes());
            buf.extend_from_slice(&0_u16.to_be_bytes());

            for (name, value) in self.params {
                buf.put_str_nul(name);
                buf.put_str_nul(value);
            }

            buf.push(0);
        });
    }
}
