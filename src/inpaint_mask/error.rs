/// An error that can occur while loading, painting or exporting a mask.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("mask surface is not ready, the source image has not finished loading")]
    NotReady,
    #[error("failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode mask as PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to fetch source image: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("source image or container has zero width or height")]
    EmptyImage,
}

/// An error returned by the inpainting endpoint client.
#[derive(Debug, thiserror::Error)]
pub enum InpaintError {
    #[error("inpaint request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("inpaint request rejected: {0}")]
    Rejected(String),
    #[error("no inpaint endpoint configured")]
    NoEndpoint,
}
