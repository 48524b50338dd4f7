use crate::io::Encode;

// Ends an extended-query sequence. The backend responds by closing the
// current transaction (if any) and issuing ReadyForQuery; after an error it
// skips messages until Sync is seen, which is what makes this the recovery
// point for a failed Parse.

#[derive(Debug)]
pub(crate) struct Sync;

impl Encode for Sync {
    #[inline]
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'S');
        buf.extend_from_slice(&4_i32.to_be_bytes());
    }
}
