#![allow(dead_code)]

/// Encode an 8-bit PNG in memory.
pub fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    buf
}

/// A gray PNG with a horizontal gradient.
pub fn gray_png(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).map(|x| (x % 256) as u8))
        .collect();
    encode_png(width, height, png::ColorType::Grayscale, &data)
}
