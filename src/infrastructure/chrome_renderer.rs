//! Chromium PDF 渲染器 - 基础设施层
//!
//! 持有一个 Page 资源，只暴露"预览 HTML -> PDF 字节"的能力：
//! 1. 载入预览 HTML，定位预览区域
//! 2. 按倍率截取 JPEG 栅格图
//! 3. 把栅格图切片排到 A4 纸上并打印

use base64::{engine::general_purpose, Engine as _};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, PrintToPdfParams, Viewport,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::infrastructure::pdf::{paginate, sheet_html, PdfRenderer, PdfSettings};
use crate::services::presenter::PREVIEW_ELEMENT_ID;

// 等待页面内所有图片解码完成
const WAIT_FOR_IMAGES_JS: &str = r#"
Promise.all(Array.from(document.images).map(img =>
    img.complete ? true : new Promise(resolve => { img.onload = img.onerror = () => resolve(true); })
)).then(() => document.images.length)
"#;

/// 栅格化后的预览区域
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub jpeg: Vec<u8>,
    /// 预览区域的 CSS 像素尺寸
    pub width_px: f64,
    pub height_px: f64,
}

/// Chromium PDF 渲染器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 不认识 ReportRecord / ReportSession
/// - 不处理导出流程（必填检查、防重入、写文件）
pub struct ChromePdfRenderer {
    page: Page,
}

impl ChromePdfRenderer {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 载入 HTML 并等待图片加载
    async fn load(&self, html: &str) -> Result<(), ExportError> {
        self.page
            .set_content(html)
            .await
            .map_err(ExportError::render_failed)?;
        let images = self.eval(WAIT_FOR_IMAGES_JS).await?;
        debug!("页面载入完成，图片数: {}", images);
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    async fn eval(&self, js_code: &str) -> Result<JsonValue, ExportError> {
        let result = self
            .page
            .evaluate(js_code.to_string())
            .await
            .map_err(ExportError::render_failed)?;
        result.into_value().map_err(ExportError::render_failed)
    }

    /// 截取预览区域
    pub async fn rasterize(
        &self,
        preview_html: &str,
        settings: &PdfSettings,
    ) -> Result<RasterImage, ExportError> {
        self.load(preview_html).await?;

        let selector = format!("#{}", PREVIEW_ELEMENT_ID);
        let element = self
            .page
            .find_element(selector.as_str())
            .await
            .map_err(|_| ExportError::PreviewNotFound {
                selector: selector.clone(),
            })?;
        let bbox = element
            .bounding_box()
            .await
            .map_err(ExportError::render_failed)?;
        debug!(
            "预览区域: {:.0}x{:.0} @ ({:.0}, {:.0})",
            bbox.width, bbox.height, bbox.x, bbox.y
        );

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Jpeg)
            .quality(settings.jpeg_quality())
            .clip(Viewport {
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
                scale: settings.raster_scale,
            })
            .capture_beyond_viewport(true)
            .build();
        let jpeg = self
            .page
            .screenshot(params)
            .await
            .map_err(ExportError::render_failed)?;

        Ok(RasterImage {
            jpeg,
            width_px: bbox.width,
            height_px: bbox.height,
        })
    }

    /// 把栅格图排到纸张上并打印
    pub async fn print(
        &self,
        image: &RasterImage,
        settings: &PdfSettings,
    ) -> Result<Vec<u8>, ExportError> {
        let layout = paginate(image.width_px, image.height_px, settings).ok_or_else(|| {
            ExportError::render_failed(format!(
                "预览区域尺寸无效: {}x{}",
                image.width_px, image.height_px
            ))
        })?;
        debug!("分页: {} 页", layout.pages);

        let data_url = format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(&image.jpeg)
        );
        self.load(&sheet_html(&data_url, &layout)).await?;

        let params = PrintToPdfParams {
            landscape: Some(false),
            print_background: Some(true),
            paper_width: Some(settings.page_width_in()),
            paper_height: Some(settings.page_height_in()),
            margin_top: Some(settings.margin_in()),
            margin_bottom: Some(settings.margin_in()),
            margin_left: Some(settings.margin_in()),
            margin_right: Some(settings.margin_in()),
            prefer_css_page_size: Some(false),
            ..Default::default()
        };
        self.page
            .pdf(params)
            .await
            .map_err(ExportError::render_failed)
    }
}

impl PdfRenderer for ChromePdfRenderer {
    async fn render_pdf(
        &self,
        preview_html: &str,
        settings: &PdfSettings,
    ) -> Result<Vec<u8>, ExportError> {
        let image = self.rasterize(preview_html, settings).await?;
        self.print(&image, settings).await
    }

    async fn release(&self) {
        if let Err(e) = self.page.clone().close().await {
            warn!("关闭页面失败: {}", e);
        }
    }
}
