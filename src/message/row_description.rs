use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::{BufExt, Decode};

#[derive(Debug)]
pub struct RowDescription {
    pub fields: Vec<Field>,
}

/// The description of a single result column.
#[derive(Debug, Clone)]
pub struct Field {
    /// The name of the field.
    pub name: String,

    /// If the field can be identified as a column of a specific table, the
    /// object ID of the table; otherwise zero.
    pub relation_id: u32,

    /// If the field can be identified as a column of a specific table, the
    /// attribute number of the column; otherwise zero.
    pub relation_attribute_no: i16,

    /// The object ID of the field's data type.
    pub data_type_id: u32,

    /// The data type size (negative values denote variable-width types).
    pub data_type_size: i16,

    /// The type modifier.
    pub type_modifier: i32,

    /// The format code being used for the field (0 = text, 1 = binary).
    pub format: i16,
}

impl Decode for RowDescription {
    fn decode(mut buf: Bytes) -> Result<Self> {
        let cnt = buf.get_u16() as usize;
        let mut fields = Vec::with_capacity(cnt);

        for _ in 0..cnt {
            fields.push(Field {
                name: buf.get_str_nul()?,
                relation_id: buf.get_u32(),
                relation_attribute_no: buf.get_i16(),
                data_type_id: buf.get_u32(),
                data_type_size: buf.get_i16(),
                type_modifier: buf.get_i32(),
                format: buf.get_i16(),
            });
        }

        Ok(Self { fields })
    }
}
