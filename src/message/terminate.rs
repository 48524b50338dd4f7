use crate::io::Encode;

#[derive(Debug)]
pub(crate) struct Terminate;

impl Encode for Terminate {
    #[inline]
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'X');
        buf.extend_from_slice(&4_i32.to_be_bytes());
    }
}
