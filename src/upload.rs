use crate::error::{Error, Result};

/// 校验上传的图片文件名，只接受 `.png`（不区分大小写）
pub fn validate_png(file_name: &str) -> Result<()> {
    if file_name.to_lowercase().ends_with(".png") {
        Ok(())
    } else {
        Err(Error::InvalidUpload(format!(
            "image must be a .PNG file: {file_name}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_png_any_case() {
        assert!(validate_png("favicon.png").is_ok());
        assert!(validate_png("assets/favicon/2025/07/ICON.PNG").is_ok());
        assert!(validate_png("logo.Png").is_ok());
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["favicon.ico", "photo.jpg", "png", "image.png.exe", ""] {
            assert!(
                matches!(validate_png(name), Err(Error::InvalidUpload(_))),
                "{name:?} 应被拒绝"
            );
        }
    }
}
