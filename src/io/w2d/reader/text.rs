//! Text opcode decoders

use crate::error::{DwfError, Result};
use crate::io::w2d::context::DecodeContext;
use crate::io::w2d::opcode::Precision;
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::records::{OpcodeRecord, Text, TextOptions};

const OPTION_END: u8 = 0;
const OPTION_OVERSCORE: u8 = 1;
const OPTION_UNDERSCORE: u8 = 2;
const OPTION_BOUNDS: u8 = 3;

/// Decode basic (`complex == false`) or complex text.
///
/// Both start with a relative 32-bit anchor and a UTF-16 string. Complex
/// text continues with option sub-records until a zero option byte.
pub(crate) fn read_text(
    reader: &mut W2dStreamReader<'_>,
    ctx: &DecodeContext,
    complex: bool,
) -> Result<OpcodeRecord> {
    let position = reader.read_point32()?;
    let string = reader.read_utf16_string()?;
    let options = if complex {
        read_options(reader)?
    } else {
        TextOptions::default()
    };

    Ok(OpcodeRecord::Text(Text {
        position,
        string,
        font_ref: ctx.current_font.clone(),
        options,
        relative: true,
    }))
}

fn read_options(reader: &mut W2dStreamReader<'_>) -> Result<TextOptions> {
    let mut options = TextOptions::default();
    loop {
        let offset = reader.position();
        match reader.read_u8()? {
            OPTION_END => return Ok(options),
            OPTION_OVERSCORE => options.overscore = read_positions(reader)?,
            OPTION_UNDERSCORE => options.underscore = read_positions(reader)?,
            OPTION_BOUNDS => {
                let p = reader.read_points(4, Precision::Relative32)?;
                options.bounds = Some([p[0], p[1], p[2], p[3]]);
            }
            other => {
                return Err(DwfError::UnknownOpcode {
                    offset,
                    opcode: other as u16,
                })
            }
        }
    }
}

fn read_positions(reader: &mut W2dStreamReader<'_>) -> Result<Vec<u16>> {
    let count = reader.read_extended_count()?;
    reader.ensure(count * 2)?;
    (0..count).map(|_| reader.read_u16()).collect()
}
