use image::DynamicImage;
use tracing::info;

use super::error::MaskError;
use super::export::decode_data_url;

/// Fetch and decode the image behind `url`.
///
/// `data:` URLs (uploaded files) are decoded in place, anything else is
/// fetched over HTTP.
pub async fn fetch_source_image(url: &str) -> Result<DynamicImage, MaskError> {
    let bytes = if url.starts_with("data:") {
        decode_data_url(url)?
    } else {
        info!("fetching source image from {url}");
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    decode_source_image(&bytes)
}

pub fn decode_source_image(bytes: &[u8]) -> Result<DynamicImage, MaskError> {
    let image = image::load_from_memory(bytes).map_err(MaskError::Decode)?;
    info!("decoded source image {}x{}", image.width(), image.height());
    Ok(image)
}
