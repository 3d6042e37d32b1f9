/// Snapshot download and decoding
///
/// Downloads one snapshot's bytes from the bucket and decodes them into an
/// iced image handle. Nothing is cached: every call is a fresh round trip.
use aws_sdk_s3::Client;
use iced::widget::image::Handle;
use tokio::task;

use super::StoreError;

/// A decoded snapshot ready for display
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Download `key` from the bucket and decode it.
///
/// Any failure (missing object, transport error, undecodable bytes) comes
/// back as a `StoreError`; the caller surfaces the message and renders no
/// image. There is no retry.
pub async fn fetch_image(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<FetchedImage, StoreError> {
    let output = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| StoreError::Download {
            key: key.to_string(),
            message: e.into_service_error().to_string(),
        })?;

    let bytes = output
        .body
        .collect()
        .await
        .map_err(|e| StoreError::Download {
            key: key.to_string(),
            message: e.to_string(),
        })?
        .into_bytes();

    println!("📡 Downloaded {} ({} bytes)", key, bytes.len());

    // Spawn blocking because decoding is CPU-intensive
    let owned_key = key.to_string();
    task::spawn_blocking(move || {
        let (pixels, width, height) =
            decode_image(&bytes).map_err(|message| StoreError::Decode {
                key: owned_key,
                message,
            })?;

        Ok(FetchedImage {
            handle: Handle::from_rgba(width, height, pixels),
            width,
            height,
        })
    })
    .await
    .map_err(|e| StoreError::Decode {
        key: key.to_string(),
        message: format!("task join error: {}", e),
    })?
}

/// Decode encoded image bytes into RGBA pixels.
///
/// The format is inferred from the bytes, so the viewer keeps working if
/// the bucket ever grows JPEG snapshots next to the PNGs.
fn decode_image(bytes: &[u8]) -> Result<(Vec<u8>, u32, u32), String> {
    let decoded = image::load_from_memory(bytes).map_err(|e| e.to_string())?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok((rgba.into_vec(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([12, 84, 96, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_valid_png() {
        let (pixels, width, height) = decode_image(&png_bytes(4, 3)).unwrap();

        assert_eq!((width, height), (4, 3));
        assert_eq!(pixels.len(), 4 * 3 * 4);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_fetch_with_unusable_client_is_an_error() {
        let client = crate::store::test_client();
        let result =
            fetch_image(&client, "penage-true-color-images", "1970-01-01.png").await;

        assert!(result.is_err());
    }
}
