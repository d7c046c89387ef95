/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images do not have matching sizes.
    #[error("Invalid image size ({0}x{1}), expected ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel coordinate lies outside the image.
    #[error("Pixel coordinates ({0}, {1}) are out of the image bounds")]
    PixelIndexOutOfBounds(usize, usize),

    /// Error when a channel index exceeds the number of channels.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a convolution kernel is empty.
    #[error("Convolution kernel must not be empty")]
    InvalidKernelLength,

    /// Error when a value cannot be converted to the pixel type.
    #[error("Failed to cast the value to the pixel type")]
    CastError,
}
