//! Record envelope reader
//!
//! ## Layouts
//! ```text
//! Contact: [varint id] FF [varint] FF 0D [root value ...]
//! Message: [varint id] FF [subtype]  FF 0D [root value ...]
//! ```
//! A message record whose first marker is not `FF` has some other shape and
//! is skipped by the caller.

use crate::error::{IdbError, Result};
use crate::key::RecordKind;

use super::{varint, Cursor};

const MARKER: u8 = 0xff;
const BODY_START: u8 = 0x0d;

/// Message sub-type discriminators seen in the wild.
pub const MESSAGE_SUBTYPES: &[u8] = &[0x12, 0x13];

/// A stripped record: preamble fields plus the bytes of the root value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Leading varint, taken to be the record id.
    pub record_id: u64,
    /// Discriminator byte of message records.
    pub subtype: Option<u8>,
    /// Bytes starting at the root value.
    pub body: &'a [u8],
}

/// Strip the preamble of `raw` according to the record kind.
pub fn strip_envelope(raw: &[u8], kind: RecordKind) -> Result<Envelope<'_>> {
    let mut cursor = Cursor::new(raw);
    let (record_id, _) = varint::decode(&mut cursor)?;

    let subtype = match kind {
        RecordKind::Contact => {
            cursor.expect_u8(MARKER, "0xff marker")?;
            varint::decode(&mut cursor)?;
            None
        }
        RecordKind::Message => {
            let found = cursor.peek_u8()?;
            if found != MARKER {
                return Err(IdbError::UnrecognizedRecordShape { found });
            }
            cursor.skip(1)?;
            let at = cursor.pos();
            let subtype = cursor.read_u8()?;
            if !MESSAGE_SUBTYPES.contains(&subtype) {
                return Err(IdbError::MalformedEnvelope {
                    at,
                    expected: "message subtype 0x12 or 0x13",
                    found: subtype,
                });
            }
            Some(subtype)
        }
    };

    cursor.expect_u8(MARKER, "0xff marker")?;
    cursor.expect_u8(BODY_START, "0x0d body start")?;

    Ok(Envelope {
        record_id,
        subtype,
        body: cursor.rest(),
    })
}
