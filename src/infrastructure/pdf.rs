//! PDF 版式与渲染能力 - 基础设施层
//!
//! 版式参数固定：A4 纵向，10mm 边距，栅格化倍率 2，JPEG 质量 0.98。

use std::future::Future;

use crate::error::ExportError;

const MM_PER_INCH: f64 = 25.4;

/// PDF 版式参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfSettings {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    /// 栅格化倍率（设备像素 / CSS 像素）
    pub raster_scale: f64,
    /// JPEG 质量，0.0 - 1.0
    pub image_quality: f64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            raster_scale: 2.0,
            image_quality: 0.98,
        }
    }
}

impl PdfSettings {
    pub fn content_width_mm(&self) -> f64 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f64 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// CDP 截图使用的 0-100 整数质量
    pub fn jpeg_quality(&self) -> i64 {
        (self.image_quality * 100.0).round() as i64
    }

    pub fn page_width_in(&self) -> f64 {
        self.page_width_mm / MM_PER_INCH
    }

    pub fn page_height_in(&self) -> f64 {
        self.page_height_mm / MM_PER_INCH
    }

    pub fn margin_in(&self) -> f64 {
        self.margin_mm / MM_PER_INCH
    }
}

/// 栅格图缩放到内容宽度后在纸面上的分页结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub pages: usize,
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    pub slice_height_mm: f64,
}

/// 计算分页；宽或高不为正时返回 `None`
pub fn paginate(width_px: f64, height_px: f64, settings: &PdfSettings) -> Option<PageLayout> {
    if !(width_px > 0.0 && height_px > 0.0) {
        return None;
    }
    let image_width_mm = settings.content_width_mm();
    let image_height_mm = height_px / width_px * image_width_mm;
    let slice_height_mm = settings.content_height_mm();
    // 浮点误差内恰好一页时不多出空白页
    let pages = ((image_height_mm / slice_height_mm) - 1e-6).ceil().max(1.0) as usize;
    Some(PageLayout {
        pages,
        image_width_mm,
        image_height_mm,
        slice_height_mm,
    })
}

/// 生成分页纸张的 HTML：每页放一个裁剪窗口，图片按页向上平移
pub fn sheet_html(image_data_url: &str, layout: &PageLayout) -> String {
    let mut html = String::with_capacity(image_data_url.len() * layout.pages + 512);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>");
    html.push_str("html,body{margin:0;padding:0;background:#fff}");
    html.push_str(&format!(
        ".sheet{{width:{w:.3}mm;height:{h:.3}mm;overflow:hidden;break-after:page;page-break-after:always}}",
        w = layout.image_width_mm,
        h = layout.slice_height_mm
    ));
    html.push_str(".sheet:last-child{break-after:auto;page-break-after:auto}");
    html.push_str(&format!(
        ".sheet img{{display:block;width:{:.3}mm}}",
        layout.image_width_mm
    ));
    html.push_str("</style></head><body>");
    for page in 0..layout.pages {
        html.push_str(&format!(
            "<div class=\"sheet\"><img style=\"margin-top:-{:.3}mm\" src=\"{}\"></div>",
            page as f64 * layout.slice_height_mm,
            image_data_url
        ));
    }
    html.push_str("</body></html>");
    html
}

/// 把预览 HTML 渲染为 PDF 字节的能力
pub trait PdfRenderer: Send + Sync {
    fn render_pdf(
        &self,
        preview_html: &str,
        settings: &PdfSettings,
    ) -> impl Future<Output = Result<Vec<u8>, ExportError>> + Send;

    /// 释放渲染器持有的资源（例如关闭页面），默认什么也不做
    fn release(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
