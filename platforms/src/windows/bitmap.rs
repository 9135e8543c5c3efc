use std::slice;

use windows::Win32::Graphics::Gdi::{BITMAPFILEHEADER, BITMAPINFOHEADER};

const HEADER_LEN: usize = size_of::<BITMAPFILEHEADER>() + size_of::<BITMAPINFOHEADER>();

/// Wraps a packed 32-bit BGRA pixel buffer into a complete top-down `.bmp`
/// byte vector.
///
/// `data` must hold exactly `width * height * 4` bytes.
pub fn bgra_to_bmp(data: &[u8], width: i32, height: i32) -> Vec<u8> {
    assert_eq!(data.len(), width as usize * height as usize * 4);
    let file_header = BITMAPFILEHEADER {
        bfType: 0x4D42,
        bfSize: (HEADER_LEN + data.len()) as u32,
        bfOffBits: HEADER_LEN as u32,
        ..BITMAPFILEHEADER::default()
    };
    let info_header = BITMAPINFOHEADER {
        biSize: size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width,
        biHeight: -height,
        biPlanes: 1,
        biBitCount: 32,
        biSizeImage: data.len() as u32,
        ..BITMAPINFOHEADER::default()
    };

    let mut bmp = Vec::with_capacity(HEADER_LEN + data.len());
    bmp.extend_from_slice(as_bytes(&file_header));
    bmp.extend_from_slice(as_bytes(&info_header));
    bmp.extend_from_slice(data);
    bmp
}

// SAFETY: only used on the plain-old-data GDI header structs, read as raw
// initialized bytes
fn as_bytes<T>(value: &T) -> &[u8] {
    unsafe { slice::from_raw_parts((value as *const T).cast(), size_of::<T>()) }
}

#[cfg(test)]
mod tests {
    use super::bgra_to_bmp;

    #[test]
    fn wraps_payload_behind_headers() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let bmp = bgra_to_bmp(&data, 2, 1);
        assert_eq!(bmp.len(), 54 + 8);
        assert_eq!(bmp[..2], *b"BM");
        assert_eq!(u32::from_le_bytes(bmp[2..6].try_into().unwrap()), 62);
        let offset = u32::from_le_bytes(bmp[10..14].try_into().unwrap());
        assert_eq!(offset, 54);
        assert_eq!(bmp[offset as usize..], data);
    }

    #[test]
    fn declares_top_down_32bit_pixels() {
        let bmp = bgra_to_bmp(&[0u8; 4], 1, 1);
        let width = i32::from_le_bytes(bmp[18..22].try_into().unwrap());
        let height = i32::from_le_bytes(bmp[22..26].try_into().unwrap());
        let bit_count = u16::from_le_bytes(bmp[28..30].try_into().unwrap());
        assert_eq!((width, height, bit_count), (1, -1, 32));
    }
}
