//! 报告会话 - 流程层
//!
//! 持有一份表单的全部状态：记录、启用集合、照片。
//! 每次编辑或切换都会用重新计算过的新记录替换旧记录。

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::FormError;
use crate::models::{
    ActiveFieldSet, Category, FieldEdit, PhotoState, ReportForm, ReportRecord, StudentPhoto,
};
use crate::services::aggregator;
use crate::services::presenter::{render_html, Branding, ReportView};

#[derive(Debug, Clone, Default)]
pub struct ReportSession {
    record: ReportRecord,
    active: ActiveFieldSet,
    photo: PhotoState,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &ReportRecord {
        &self.record
    }

    pub fn active(&self) -> &ActiveFieldSet {
        &self.active
    }

    pub fn photo(&self) -> &PhotoState {
        &self.photo
    }

    /// 应用一次字段编辑并重新计算
    ///
    /// 校验失败时状态保持不变。
    pub fn apply(&mut self, edit: &FieldEdit) -> Result<(), FormError> {
        let next = self.record.with_edit(edit)?;
        self.record = aggregator::recompute(&next, &self.active);
        Ok(())
    }

    /// 切换一个类别并用已输入的值重新计算，返回切换后的状态
    pub fn toggle(&mut self, category: Category) -> bool {
        let now_active = self.active.toggle(category);
        debug!("切换类别 {} -> {}", category, now_active);
        self.record = aggregator::recompute(&self.record, &self.active);
        now_active
    }

    /// 显式设置类别启用状态
    pub fn set_active(&mut self, category: Category, active: bool) {
        if self.active.is_active(category) != active {
            self.toggle(category);
        }
    }

    /// 标记照片开始读取
    pub fn begin_photo(&mut self) {
        self.photo = PhotoState::Pending;
    }

    pub fn set_photo(&mut self, photo: StudentPhoto) {
        self.photo = PhotoState::Ready(photo);
    }

    pub fn clear_photo(&mut self) {
        self.photo = PhotoState::Empty;
    }

    /// 读取照片文件；失败时清除照片并返回错误
    pub async fn load_photo(&mut self, path: &Path) -> Result<()> {
        self.begin_photo();
        match StudentPhoto::load(path).await {
            Ok(photo) => {
                self.set_photo(photo);
                Ok(())
            }
            Err(e) => {
                self.clear_photo();
                Err(e)
            }
        }
    }

    /// 当前状态的预览投影
    pub fn view(&self) -> ReportView {
        ReportView::project(&self.record, &self.active, self.photo.ready())
    }

    /// 当前状态的预览 HTML
    pub fn render(&self, branding: &Branding) -> String {
        render_html(&self.view(), branding)
    }

    /// 按表单文件回放编辑与切换
    ///
    /// 照片读取失败只记录警告，报告照常生成。
    pub async fn from_form(form: &ReportForm) -> Result<Self> {
        let mut session = Self::new();
        for category in Category::ALL {
            session.set_active(category, form.active.get(category));
        }
        for edit in form.edits() {
            session.apply(&edit)?;
        }
        if let Some(path) = &form.photo {
            if let Err(e) = session.load_photo(path).await {
                warn!("⚠️ 照片加载失败 ({}): {:#}", path.display(), e);
            }
        }
        Ok(session)
    }
}
