use crate::io::{BufMutExt, Encode};

#[derive(Debug)]
pub(crate) struct Query<'a>(pub(crate) &'a str);

impl Encode for Query<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'Q');
        buf.put_length_prefixed(|buf| {
            buf.put_str_nul(self.0);
        });
    }
}
