use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::Decode;

#[derive(Debug)]
pub(crate) struct ParameterDescription {
    /// The object ID of each parameter's data type, in parameter order.
    pub(crate) types: Vec<u32>,
}

impl Decode for ParameterDescription {
    fn decode(mut buf: Bytes) -> Result<Self> {
        let cnt = buf.get_u16() as usize;
        let mut types = Vec::with_capacity(cnt);

        for _ in 0..cnt {
            types.push(buf.get_u32());
        }

        Ok(Self { types })
    }
}
