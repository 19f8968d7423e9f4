//! Image and color-map payload decoders (extended binary opcodes)

use crate::error::Result;
use crate::io::w2d::stream_reader::W2dStreamReader;
use crate::records::{Image, ImageFormat};
use crate::types::ColorMap;

/// Columns, rows, two absolute corners, identifier, optional color map,
/// then a `u32` byte count and the encoded pixels.
pub(crate) fn read_image(reader: &mut W2dStreamReader<'_>, format: ImageFormat) -> Result<Image> {
    let columns = reader.read_u16()?;
    let rows = reader.read_u16()?;
    let min_corner = reader.read_point32()?;
    let max_corner = reader.read_point32()?;
    let identifier = reader.read_i32()?;

    let color_map = if format.has_color_map() {
        let count = reader.read_extended_count()?;
        reader.ensure(count * 4)?;
        Some((0..count).map(|_| reader.read_rgba()).collect::<Result<Vec<_>>>()?)
    } else {
        None
    };

    let data_size = reader.read_u32()? as usize;
    let pixels = reader.read_bytes(data_size)?.to_vec();

    Ok(Image {
        format,
        columns,
        rows,
        min_corner,
        max_corner,
        identifier,
        color_map,
        pixels,
    })
}

/// Entry count in one byte (`0` meaning 256), then RGBA entries.
pub(crate) fn read_color_map(reader: &mut W2dStreamReader<'_>) -> Result<ColorMap> {
    let count = match reader.read_u8()? {
        0 => 256,
        n => n as usize,
    };
    reader.ensure(count * 4)?;
    let entries = (0..count)
        .map(|_| reader.read_rgba())
        .collect::<Result<Vec<_>>>()?;
    Ok(ColorMap::new(entries))
}
