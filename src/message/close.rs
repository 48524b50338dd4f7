use crate::io::{BufMutExt, Encode};

const CLOSE_PORTAL: u8 = b'P';
const CLOSE_STATEMENT: u8 = b'S';

#[derive(Debug)]
#[allow(dead_code)]
pub(crate) enum Close<'a> {
    Statement(&'a str),
    Portal(&'a str),
}

impl Encode for Close<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'C');

        buf.put_length_prefixed(|buf| match self {
            Close::Statement(name) => {
                buf.push(CLOSE_STATEMENT);
                buf.put_str_nul(name);
            }

            Close::Portal(name) => {
                buf.push(CLOSE_PORTAL);
                buf.put_str_nul(name);
            }
        });
    }
}
