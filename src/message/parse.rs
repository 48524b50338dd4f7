use crate::io::{BufMutExt, Encode};

#[derive(Debug)]
pub(crate) struct Parse<'a> {
    /// The name of the destination prepared statement.
    pub(crate) statement: &'a str,

    /// The query string to be parsed.
    pub(crate) query: &'a str,

    /// The parameter data types specified (could be zero). Note that this is
    /// not an indication of the number of parameters that might appear in the
    /// query string, only the number that the frontend wants to pre-specify
    /// types for.
    pub(crate) param_types: &'a [u32],
}

impl Encode for Parse<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'P');

        buf.put_length_prefixed(|buf| {
            buf.put_str_nul(self.statement);
            buf.put_str_nul(self.query);

            buf.extend_from_slice(&(self.param_types.len() as i16).to_be_bytes());

            for &oid in self.param_types {
                buf.extend_from_slice(&oid.to_be_bytes());
            }
        });
    }
}
