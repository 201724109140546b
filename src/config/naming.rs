//! Output filename derivation.

use super::kinds::{BorderPolicy, FilterKind};

/// Build the default output name for `input`.
///
/// The extension after the last `.` of the final path component is
/// stripped (the whole name is kept when there is none) and
/// `_filter_<kind>_<border>.png` is appended. No I/O is performed.
pub fn derive_output_filename(input: &str, filter: FilterKind, border: BorderPolicy) -> String {
    let name_start = input.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let stem = match input[name_start..].rfind('.') {
        Some(dot) => &input[..name_start + dot],
        None => input,
    };
    format!("{}_filter_{}_{}.png", stem, filter, border)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_extension() {
        assert_eq!(
            derive_output_filename("photo.jpg", FilterKind::Gauss, BorderPolicy::None),
            "photo_filter_gauss_none.png"
        );
    }

    #[test]
    fn test_no_extension_keeps_name() {
        assert_eq!(
            derive_output_filename("image", FilterKind::Box, BorderPolicy::Replicate),
            "image_filter_box_replicate.png"
        );
    }

    #[test]
    fn test_only_last_dot_is_stripped() {
        assert_eq!(
            derive_output_filename("archive.tar.gz", FilterKind::Wiener, BorderPolicy::Replicate),
            "archive.tar_filter_wiener_replicate.png"
        );
    }

    #[test]
    fn test_dots_in_directories_are_kept() {
        assert_eq!(
            derive_output_filename("./data/lena", FilterKind::Sharpen, BorderPolicy::None),
            "./data/lena_filter_sharpen_none.png"
        );
        assert_eq!(
            derive_output_filename("../img.v2/pic.png", FilterKind::SobelHoriz, BorderPolicy::None),
            "../img.v2/pic_filter_sobel_h_none.png"
        );
    }
}
