//! 学生照片
//!
//! 照片异步读取后以 data URL 形式保存，便于直接嵌入预览 HTML。

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use tokio::fs;

/// 已解码、可嵌入的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPhoto {
    data_url: String,
}

impl StudentPhoto {
    /// 由原始字节和 MIME 类型构造
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self {
            data_url: format!(
                "data:{};base64,{}",
                mime,
                general_purpose::STANDARD.encode(bytes)
            ),
        }
    }

    /// 异步读取图片文件
    pub async fn load(path: &Path) -> Result<Self> {
        let mime = image_mime(path)
            .with_context(|| format!("不支持的图片类型: {}", path.display()))?;
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("无法读取图片: {}", path.display()))?;
        Ok(Self::from_bytes(&bytes, mime))
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// 照片加载状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoState {
    #[default]
    Empty,
    /// 读取中，预览不显示照片
    Pending,
    Ready(StudentPhoto),
}

impl PhotoState {
    /// 可显示的照片
    pub fn ready(&self) -> Option<&StudentPhoto> {
        match self {
            PhotoState::Ready(photo) => Some(photo),
            _ => None,
        }
    }
}

/// 根据扩展名推断图片 MIME 类型
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("a/ali.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime(Path::new("ali.webp")), Some("image/webp"));
        assert_eq!(image_mime(Path::new("ali.txt")), None);
        assert_eq!(image_mime(Path::new("ali")), None);
    }

    #[test]
    fn test_from_bytes_builds_data_url() {
        let photo = StudentPhoto::from_bytes(b"abc", "image/png");
        assert_eq!(photo.data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"abc").unwrap();

        let photo = tokio_test::block_on(StudentPhoto::load(file.path())).unwrap();
        assert_eq!(photo.data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_load_rejects_non_images() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(tokio_test::block_on(StudentPhoto::load(file.path())).is_err());
    }
}
