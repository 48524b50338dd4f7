use md5::{Digest, Md5};

use crate::io::{BufMutExt, Encode};

#[derive(Debug)]
pub(crate) enum Password<'a> {
    Cleartext(&'a str),

    Md5 {
        password: &'a str,
        username: &'a str,
        salt: [u8; 4],
    },
}

impl Encode for Password<'_> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(b'p');

        buf.put_length_prefixed(|buf| match self {
            Password::Cleartext(password) => {
                buf.put_str_nul(password);
            }

            Password::Md5 {
                password,
                username,
                salt,
            } => {
                // The actual `PasswordMessage` can be computed in SQL as
                // `concat('md5', md5(concat(md5(concat(password, username)), random-salt)))`.

                let mut hasher = Md5::new();

                hasher.update(password);
                hasher.update(username);

                let mut output = hex::encode(hasher.finalize_reset());

                hasher.update(&output);
                hasher.update(salt);

                output = hex::encode(hasher.finalize());

                buf.extend_from_slice(b"md5");
                buf.put_str_nul(&output);
            }
        });
    }
}
