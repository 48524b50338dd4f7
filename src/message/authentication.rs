use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::Decode;

#[derive(Debug)]
pub(crate) enum Authentication {
    /// The authentication exchange is successfully completed.
    Ok,

    /// The frontend must now send a [Password] containing the password in
    /// clear-text form.
    CleartextPassword,

    /// The frontend must now send a [Password] containing the password
    /// (with user name) encrypted via MD5, then encrypted again using the
    /// 4-byte random salt specified here.
    Md5Password(Md5Password),

    /// An authentication method this crate does not implement (SASL, GSS,
    /// SSPI, ...). Carried so the handshake can report it by code.
    Other(u32),
}

#[derive(Debug)]
pub(crate) struct Md5Password {
    pub(crate) salt: [u8; 4],
}

impl Decode for Authentication {
    fn decode(mut buf: Bytes) -> Result<Self> {
        Ok(match buf.get_u32() {
            0 => Authentication::Ok,

            3 => Authentication::CleartextPassword,

            5 => {
                let mut salt = [0_u8; 4];
                buf.copy_to_slice(&mut salt);

                Authentication::Md5Password(Md5Password { salt })
            }

            method => Authentication::Other(method),
        })
    }
}
