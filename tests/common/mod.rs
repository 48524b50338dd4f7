//! A scripted in-memory server: backend replies are written into one half of
//! a duplex pipe ahead of time, and the connection under test drains them as
//! it runs. The pipe is large enough that the client side never blocks on
//! writes.
#![allow(dead_code)]

use pg_typegen_core::{PgConnectOptions, PgConnection};
use tokio::io::{AsyncWriteExt, DuplexStream};

/// Frames a backend message: tag byte, then a length prefix that counts
/// itself but not the tag.
pub fn frame(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(((body.len() + 4) as u32).to_be_bytes());
    out.extend(body);
    out
}

pub fn auth_ok() -> Vec<u8> {
    frame(b'R', &0u32.to_be_bytes())
}

pub fn auth_md5(salt: [u8; 4]) -> Vec<u8> {
    let mut body = 5u32.to_be_bytes().to_vec();
    body.extend(salt);
    frame(b'R', &body)
}

pub fn backend_key_data(process_id: u32, secret_key: u32) -> Vec<u8> {
    let mut body = process_id.to_be_bytes().to_vec();
    body.extend(secret_key.to_be_bytes());
    frame(b'K', &body)
}

pub fn ready_for_query() -> Vec<u8> {
    frame(b'Z', b"I")
}

pub fn parse_complete() -> Vec<u8> {
    frame(b'1', b"")
}

pub fn close_complete() -> Vec<u8> {
    frame(b'3', b"")
}

pub fn no_data() -> Vec<u8> {
    frame(b'n', b"")
}

pub fn parameter_description(oids: &[u32]) -> Vec<u8> {
    let mut body = (oids.len() as u16).to_be_bytes().to_vec();

    for oid in oids {
        body.extend(oid.to_be_bytes());
    }

    frame(b't', &body)
}

/// One result-column descriptor: output name, table OID (0 for none),
/// attribute number, and type OID.
pub fn row_description(fields: &[(&str, u32, i16, u32)]) -> Vec<u8> {
    let mut body = (fields.len() as u16).to_be_bytes().to_vec();

    for &(name, relation_id, attribute_no, type_oid) in fields {
        body.extend(name.as_bytes());
        body.push(0);
        body.extend(relation_id.to_be_bytes());
        body.extend(attribute_no.to_be_bytes());
        body.extend(type_oid.to_be_bytes());
        body.extend((-1i16).to_be_bytes()); // variable size
        body.extend((-1i32).to_be_bytes()); // no type modifier
        body.extend(0i16.to_be_bytes()); // text format
    }

    frame(b'T', &body)
}

pub fn data_row(values: &[Option<&str>]) -> Vec<u8> {
    let mut body = (values.len() as u16).to_be_bytes().to_vec();

    for value in values {
        match value {
            Some(value) => {
                body.extend((value.len() as i32).to_be_bytes());
                body.extend(value.as_bytes());
            }

            None => {
                body.extend((-1i32).to_be_bytes());
            }
        }
    }

    frame(b'D', &body)
}

pub fn command_complete(tag: &str) -> Vec<u8> {
    let mut body = tag.as_bytes().to_vec();
    body.push(0);
    frame(b'C', &body)
}

/// Notice and error responses share one body layout: a sequence of
/// single-letter field codes, each followed by a NUL-terminated value.
pub fn response_body(fields: &[(u8, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    for &(code, value) in fields {
        body.push(code);
        body.extend(value.as_bytes());
        body.push(0);
    }

    body.push(0);
    body
}

pub fn error_response(code: &str, message: &str, position: Option<&str>) -> Vec<u8> {
    let mut fields = vec![
        (b'S', "ERROR"),
        (b'V', "ERROR"),
        (b'C', code),
        (b'M', message),
    ];

    if let Some(position) = position {
        fields.push((b'P', position));
    }

    frame(b'E', &response_body(&fields))
}

pub fn notice_response(message: &str) -> Vec<u8> {
    frame(
        b'N',
        &response_body(&[
            (b'S', "NOTICE"),
            (b'V', "NOTICE"),
            (b'C', "00000"),
            (b'M', message),
        ]),
    )
}

pub fn parameter_status(name: &str, value: &str) -> Vec<u8> {
    let mut body = name.as_bytes().to_vec();
    body.push(0);
    body.extend(value.as_bytes());
    body.push(0);
    frame(b'S', &body)
}

pub fn options() -> PgConnectOptions {
    PgConnectOptions::new().username("postgres").database("app")
}

/// Runs the startup handshake against a trust-authenticating scripted server
/// and hands back the connection plus the server half of the pipe, so tests
/// can feed further replies (or inspect what the client sent).
pub async fn handshake(
    options: &PgConnectOptions,
) -> anyhow::Result<(PgConnection<DuplexStream>, DuplexStream)> {
    let (client, mut server) = tokio::io::duplex(1 << 20);

    let mut greeting = auth_ok();
    greeting.extend(backend_key_data(42, 2048));
    greeting.extend(ready_for_query());
    server.write_all(&greeting).await?;

    let conn = PgConnection::establish(client, options).await?;

    Ok((conn, server))
}
