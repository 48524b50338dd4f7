use crate::io::{BufMutExt, Encode};

const DESCRIBE_PORTAL: u8 = b'P';
const DESCRIBE_STATEMENT: u8 = b'S';

#[derive(Debug)]
#[allow(dead_code)]
pub(crate) enum Describe<'a> {
    Statement(&'a str),
    Portal(&'a str),
}

impl Encode for Describe<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'D');

        buf.put_length_prefixed(|buf| match self {
            Describe::Statement(name) => {
                buf.push(DESCRIBE_STATEMENT);
                buf.put_str_nul(name);
            }

            Describe::Portal(name) => {
                buf.push(DESCRIBE_PORTAL);
                buf.put_str_nul(name);
            }
        });
    }
}
