#![allow(dead_code)]

pub mod dav_server;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Encodes a solid-colour image of the given size.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode test image");
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// A `207 Multi-Status` body with one `<d:response>` per href.
pub fn multistatus(hrefs: &[&str]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\"?>\n<d:multistatus xmlns:d=\"DAV:\" xmlns:s=\"http://sabredav.org/ns\">\n",
    );
    for href in hrefs {
        let resourcetype = if href.ends_with('/') {
            "<d:resourcetype><d:collection/></d:resourcetype>"
        } else {
            "<d:resourcetype/>"
        };
        xml.push_str(&format!(
            "  <d:response>\n    <d:href>{}</d:href>\n    <d:propstat>\n      <d:prop>{}</d:prop>\n      <d:status>HTTP/1.1 200 OK</d:status>\n    </d:propstat>\n  </d:response>\n",
            href, resourcetype
        ));
    }
    xml.push_str("</d:multistatus>\n");
    xml
}
